use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LOCAL_TEST_MARKER: &str = "[LOCAL TEST] ";

static LOG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) - (\[LOCAL TEST\] )?Contact form submitted by (.*) \(([^()]*)\) from IP (\S+)$",
    )
    .expect("log line pattern is valid")
});

/// One line of the submission log.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmissionEntry {
    pub submitted_at: NaiveDateTime,
    pub name: String,
    pub email: String,
    pub ip: String,
    pub local_test: bool,
}

impl NewSubmissionEntry {
    /// Formats the entry as a log line, without the trailing newline.
    pub fn to_log_line(&self) -> String {
        format!(
            "{} - {}Contact form submitted by {} ({}) from IP {}",
            self.submitted_at.format(LOG_TIMESTAMP_FORMAT),
            if self.local_test { LOCAL_TEST_MARKER } else { "" },
            self.name,
            self.email,
            self.ip
        )
    }
}

/// A line read back from the log. Lines that do not parse keep only `raw`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionEntry {
    pub raw: String,
    pub submitted_at: Option<NaiveDateTime>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub ip: Option<String>,
    pub local_test: bool,
}

impl SubmissionEntry {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let raw = trimmed.to_string();

        let Some(caps) = LOG_LINE.captures(trimmed) else {
            return SubmissionEntry {
                submitted_at: raw
                    .get(..19)
                    .and_then(|ts| NaiveDateTime::parse_from_str(ts, LOG_TIMESTAMP_FORMAT).ok()),
                raw,
                name: None,
                email: None,
                ip: None,
                local_test: false,
            };
        };

        SubmissionEntry {
            submitted_at: NaiveDateTime::parse_from_str(&caps[1], LOG_TIMESTAMP_FORMAT).ok(),
            local_test: caps.get(2).is_some(),
            name: Some(caps[3].to_string()),
            email: Some(caps[4].to_string()),
            ip: Some(caps[5].to_string()),
            raw,
        }
    }

    fn date_prefix_matches(&self, prefix: &str) -> bool {
        match self.submitted_at {
            Some(ts) => ts.format(LOG_TIMESTAMP_FORMAT).to_string().starts_with(prefix),
            None => self.raw.contains(prefix),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmissionStats {
    pub total: usize,
    pub today: usize,
    pub this_month: usize,
}

impl SubmissionStats {
    pub fn compute(entries: &[SubmissionEntry], today: NaiveDate) -> Self {
        let day = today.format("%Y-%m-%d").to_string();
        let month = format!("{:04}-{:02}", today.year(), today.month());

        SubmissionStats {
            total: entries.len(),
            today: entries.iter().filter(|e| e.date_prefix_matches(&day)).count(),
            this_month: entries.iter().filter(|e| e.date_prefix_matches(&month)).count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    #[serde(flatten)]
    pub stats: SubmissionStats,
    pub submissions: Vec<SubmissionEntry>,
}
