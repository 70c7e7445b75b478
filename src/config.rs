use model::{Profile, QuizId, UserId};
use std::path::PathBuf;

/// Where quizzes and their questions are read from.
#[derive(Debug, PartialEq, Eq)]
pub enum Source {
    /// JSON question bank loaded into memory.
    File(PathBuf),
    Postgres {
        user: String,
        pass: String,
        host: String,
        data: String,
        port: u16,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub quiz: QuizId,
    pub user: UserId,
    pub candidate: Profile,
    /// Receives the JSON report once the attempt is finished.
    pub report: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| lookup(key).ok_or_else(|| anyhow::anyhow!("missing environment variable `{key}`"));

        let quiz = QuizId::from(require("QUIZ_ID")?);
        let source = match lookup("QUIZ_FILE") {
            Some(path) => Source::File(path.into()),
            None => Source::Postgres {
                user: require("PG_USERNAME")?,
                pass: require("PG_PASSWORD")?,
                host: require("PG_HOSTNAME")?,
                data: require("PG_DATABASE")?,
                port: match lookup("PG_PORT") {
                    Some(port) => port.parse()?,
                    _ => 5432,
                },
            },
        };

        let name = lookup("CANDIDATE_NAME").unwrap_or_else(|| String::from("Anonymous"));
        let user = UserId::from(lookup("CANDIDATE_ID").unwrap_or_else(|| name.clone()));
        let candidate = Profile { name, email: lookup("CANDIDATE_EMAIL") };
        let report = lookup("REPORT_FILE").map(PathBuf::from);
        Ok(Self { source, quiz, user, candidate, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<_, _> = vars.iter().map(|&(k, v)| (k.to_owned(), v.to_owned())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn file_source_with_defaults() {
        let config = parse(&[("QUIZ_ID", "planets"), ("QUIZ_FILE", "bank.json")]).unwrap();
        assert_eq!(config.source, Source::File(PathBuf::from("bank.json")));
        assert_eq!(config.quiz, QuizId::from("planets"));
        assert_eq!(config.user, UserId::from("Anonymous"));
        assert_eq!(config.candidate, Profile { name: String::from("Anonymous"), email: None });
        assert!(config.report.is_none());
    }

    #[test]
    fn postgres_source() {
        let config = parse(&[
            ("QUIZ_ID", "planets"),
            ("PG_USERNAME", "quizdesk"),
            ("PG_PASSWORD", "hunter2"),
            ("PG_HOSTNAME", "localhost"),
            ("PG_DATABASE", "quizzes"),
            ("PG_PORT", "6543"),
            ("CANDIDATE_ID", "42"),
            ("CANDIDATE_NAME", "Ferris"),
            ("CANDIDATE_EMAIL", "ferris@example.com"),
            ("REPORT_FILE", "out.json"),
        ])
        .unwrap();
        assert_eq!(
            config.source,
            Source::Postgres {
                user: String::from("quizdesk"),
                pass: String::from("hunter2"),
                host: String::from("localhost"),
                data: String::from("quizzes"),
                port: 6543,
            }
        );
        assert_eq!(config.user, UserId::from("42"));
        assert_eq!(config.candidate.email.as_deref(), Some("ferris@example.com"));
        assert_eq!(config.report, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn rejects_incomplete_environment() {
        assert!(parse(&[]).is_err());
        assert!(parse(&[("QUIZ_ID", "planets")]).is_err());
        assert!(parse(&[
            ("QUIZ_ID", "planets"),
            ("PG_USERNAME", "a"),
            ("PG_PASSWORD", "b"),
            ("PG_HOSTNAME", "c"),
            ("PG_DATABASE", "d"),
            ("PG_PORT", "not-a-port"),
        ])
        .is_err());
    }
}
