use std::fmt::Write;

use crate::http_probe::result::ProbeResult;

pub const CHAT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant for website monitoring and performance.";

pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a website monitoring assistant that summarizes site status for users.";

const NOT_AVAILABLE: &str = "not available";

/// Figures a user supplies for an ad-hoc performance summary.
#[derive(Debug, Clone)]
pub struct SummaryInput {
    pub uptime: String,
    pub response_time: String,
    pub seo: String,
    pub ssl: String,
}

pub fn summary_prompt(input: &SummaryInput) -> String {
    format!(
        "Summarize this website's performance:\n\
         - Uptime: {}\n\
         - Response Time: {}\n\
         - SEO: {}\n\
         - SSL: {}\n\
         Return a short, helpful summary in plain language.",
        input.uptime, input.response_time, input.seo, input.ssl
    )
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Describes the latest probe of a site and asks for a plain-language read.
pub fn insight_prompt(result: &ProbeResult) -> String {
    let mut prompt = String::from("Analyze the latest health check of this website:\n");

    let _ = writeln!(prompt, "- URL: {}", result.url);
    let _ = writeln!(prompt, "- Checked at: {}", result.timestamp.to_rfc3339());
    let _ = writeln!(prompt, "- HTTP status: {}", or_na(result.status_code));
    let _ = writeln!(
        prompt,
        "- Load time: {}",
        or_na(result.load_time_seconds.map(|t| format!("{t:.2}s")))
    );
    let _ = writeln!(prompt, "- Page title: {}", or_na(result.title.as_deref()));
    let _ = writeln!(
        prompt,
        "- Meta description: {}",
        or_na(result.meta_description.as_deref())
    );
    let _ = writeln!(
        prompt,
        "- SSL certificate: {}",
        or_na(result.cert_validity_days.map(|d| format!("expires in {d} days")))
    );

    if result.alerts.is_empty() {
        prompt.push_str("- Alerts: none\n");
    } else {
        prompt.push_str("- Alerts:\n");
        for alert in &result.alerts {
            let _ = writeln!(prompt, "  - {alert}");
        }
    }

    prompt.push_str(
        "Explain what these signals mean for the site's availability, speed and SEO, \
         and suggest the most important fix first. Keep it short.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt() {
        let prompt = summary_prompt(&SummaryInput {
            uptime: "99.9%".to_string(),
            response_time: "320ms".to_string(),
            seo: "good".to_string(),
            ssl: "valid".to_string(),
        });
        assert!(prompt.starts_with("Summarize this website's performance:\n"));
        assert!(prompt.contains("- Uptime: 99.9%\n"));
        assert!(prompt.contains("- Response Time: 320ms\n"));
        assert!(prompt.contains("- SEO: good\n"));
        assert!(prompt.contains("- SSL: valid\n"));
        assert!(prompt.ends_with("Return a short, helpful summary in plain language."));
    }

    #[test]
    fn test_insight_prompt_with_full_result() {
        let mut result = ProbeResult::new("https://example.com");
        result.status_code = Some(200);
        result.load_time_seconds = Some(0.5);
        result.title = Some("Example".to_string());
        result.cert_validity_days = Some(42);
        result.alerts.push("Missing meta description".to_string());

        let prompt = insight_prompt(&result);
        assert!(prompt.contains("- URL: https://example.com\n"));
        assert!(prompt.contains("- HTTP status: 200\n"));
        assert!(prompt.contains("- Load time: 0.50s\n"));
        assert!(prompt.contains("- Page title: Example\n"));
        assert!(prompt.contains("- Meta description: not available\n"));
        assert!(prompt.contains("- SSL certificate: expires in 42 days\n"));
        assert!(prompt.contains("- Alerts:\n  - Missing meta description\n"));
    }

    #[test]
    fn test_insight_prompt_for_failed_probe() {
        let mut result = ProbeResult::new("http://down.example");
        result.alerts.push("Error: request failed".to_string());

        let prompt = insight_prompt(&result);
        assert!(prompt.contains("- HTTP status: not available\n"));
        assert!(prompt.contains("- Load time: not available\n"));
        assert!(prompt.contains("- SSL certificate: not available\n"));
        assert!(prompt.contains("  - Error: request failed\n"));
    }

    #[test]
    fn test_insight_prompt_without_alerts() {
        let result = ProbeResult::new("https://example.com");
        assert!(insight_prompt(&result).contains("- Alerts: none\n"));
    }
}
