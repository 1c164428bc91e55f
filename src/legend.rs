//! Legend rendering
//!
//! Substitutes the configured placeholder names into a legend template.
//! Placeholder names come from the global settings, so documents can use
//! whatever vocabulary fits them.

use crate::settings::Settings;

/// Render `template`, replacing every occurrence of `{<progress term>}`
/// and `{<total term>}` with the current values
pub fn render(template: &str, settings: &Settings, progress: i64, total: i64) -> String {
    template
        .replace(&format!("{{{}}}", settings.progress_term), &progress.to_string())
        .replace(&format!("{{{}}}", settings.total_term), &total.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_both_placeholders() {
        let settings = Settings::default();
        let rendered = render("{current_progress}/{total}", &settings, 40, 200);
        assert_eq!(rendered, "40/200");
    }

    #[test]
    fn test_render_custom_terms() {
        let mut settings = Settings::default();
        settings.progress_term = "done".to_string();
        settings.total_term = "goal".to_string();

        let rendered = render("Completed {done} of {goal}", &settings, 3, 8);
        assert_eq!(rendered, "Completed 3 of 8");
    }

    #[test]
    fn test_render_repeated_placeholders() {
        let settings = Settings::default();
        let rendered = render("{current_progress} + {current_progress}", &settings, 5, 10);
        assert_eq!(rendered, "5 + 5");
    }

    #[test]
    fn test_render_without_placeholders() {
        let settings = Settings::default();
        assert_eq!(render("steady pace", &settings, 5, 10), "steady pace");
    }

    #[test]
    fn test_render_unknown_placeholder_untouched() {
        let settings = Settings::default();
        assert_eq!(render("{percent}", &settings, 5, 10), "{percent}");
    }
}
