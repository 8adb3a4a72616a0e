//! Crontab reference table and a five-field syntax check.
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CronReference {
    pub expression: &'static str,
    pub description: &'static str,
}

pub static CRON_REFERENCE: &[CronReference] = &[
    CronReference { expression: "* * * * *", description: "Every minute" },
    CronReference { expression: "*/5 * * * *", description: "Every 5 minutes" },
    CronReference { expression: "*/15 * * * *", description: "Every 15 minutes" },
    CronReference { expression: "0 * * * *", description: "Every hour" },
    CronReference { expression: "0 */2 * * *", description: "Every 2 hours" },
    CronReference { expression: "0 0 * * *", description: "Every day at midnight" },
    CronReference { expression: "0 0 * * 0", description: "Every Sunday at midnight" },
    CronReference { expression: "0 9 * * 1-5", description: "At 09:00 on weekdays" },
    CronReference { expression: "0 0 1 * *", description: "At midnight on the first day of every month" },
    CronReference { expression: "0 0 1 1 *", description: "At midnight on January 1st" },
    CronReference { expression: "@yearly", description: "Once a year at midnight on January 1st" },
    CronReference { expression: "@annually", description: "Once a year at midnight on January 1st" },
    CronReference { expression: "@monthly", description: "Once a month at midnight on the first day" },
    CronReference { expression: "@weekly", description: "Once a week at midnight on Sunday" },
    CronReference { expression: "@daily", description: "Once a day at midnight" },
    CronReference { expression: "@midnight", description: "Once a day at midnight" },
    CronReference { expression: "@hourly", description: "Once an hour at the beginning of the hour" },
    CronReference { expression: "@reboot", description: "At startup" },
];

// (name, min, max) per field, in crontab order.
const FIELDS: [(&str, u32, u32); 5] = [
    ("minute", 0, 59),
    ("hour", 0, 23),
    ("day of month", 1, 31),
    ("month", 1, 12),
    ("day of week", 0, 7),
];

fn normalize(expr: &str) -> String {
    expr.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Looks `expr` up in [`CRON_REFERENCE`]; whitespace runs are collapsed first.
pub fn describe_cron(expr: &str) -> Option<&'static str> {
    let normalized = normalize(expr);
    CRON_REFERENCE
        .iter()
        .find(|entry| entry.expression.eq_ignore_ascii_case(&normalized))
        .map(|entry| entry.description)
}

/// Accepts the `@` macros and five-field expressions built from `*`, `n`, `n-m`,
/// comma lists, and `/step` suffixes.
pub fn is_valid_cron(expr: &str) -> bool {
    let normalized = normalize(expr);
    if normalized.starts_with('@') {
        return describe_cron(&normalized).is_some();
    }
    let fields: Vec<&str> = normalized.split(' ').collect();
    fields.len() == FIELDS.len()
        && fields
            .iter()
            .zip(FIELDS)
            .all(|(field, (_, min, max))| field.split(',').all(|part| valid_part(part, min, max)))
}

fn valid_part(part: &str, min: u32, max: u32) -> bool {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => (range, Some(step)),
        None => (part, None),
    };
    if let Some(step) = step {
        if !step.parse::<u32>().is_ok_and(|s| s > 0 && s <= max.max(1)) {
            return false;
        }
    }
    if range == "*" {
        return true;
    }
    let in_range = |value: &str| value.parse::<u32>().is_ok_and(|v| (min..=max).contains(&v));
    match range.split_once('-') {
        Some((start, end)) => {
            in_range(start) && in_range(end) && start.parse::<u32>().ok() <= end.parse::<u32>().ok()
        }
        None => in_range(range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_everything_is_every_minute() {
        assert_eq!(describe_cron("* * * * *"), Some("Every minute"));
        assert_eq!(describe_cron("  *  * * *   * "), Some("Every minute"));
    }

    #[test]
    fn macros_are_described() {
        assert_eq!(describe_cron("@HOURLY"), describe_cron("@hourly"));
        assert!(describe_cron("@sometimes").is_none());
    }

    #[test]
    fn validates_field_syntax() {
        assert!(is_valid_cron("*/5 0-23 1,15 * 1-5"));
        assert!(is_valid_cron("@daily"));
        assert!(!is_valid_cron("60 * * * *"));
        assert!(!is_valid_cron("* * * *"));
        assert!(!is_valid_cron("5-1 * * * *"));
        assert!(!is_valid_cron("*/0 * * * *"));
        assert!(!is_valid_cron("@never"));
    }

    #[test]
    fn every_reference_entry_is_valid() {
        for entry in CRON_REFERENCE {
            assert!(is_valid_cron(entry.expression), "{}", entry.expression);
        }
    }
}
