use crate::domain::event::{DomainEvent, NoticeLevel};

/// Where a printed event line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Terminal line for an event, if the user should see it.
pub fn describe(event: &DomainEvent) -> Option<(Stream, String)> {
    match event {
        DomainEvent::Notice {
            level: NoticeLevel::Info,
            message,
        } => Some((Stream::Stdout, message.clone())),
        DomainEvent::Notice {
            level: NoticeLevel::Error,
            message,
        } => Some((Stream::Stderr, message.clone())),
        DomainEvent::AuthRequired { login_url } => Some((
            Stream::Stderr,
            format!(
                "Login required. Sign in at {} and pass the session cookie with --session or GROUPMATE_SESSION.",
                login_url
            ),
        )),
        other => {
            tracing::debug!("Event {}: {:?}", other.event_name(), other);
            None
        }
    }
}

/// Print drained events. Repeated login prompts collapse into one.
pub fn print_events(events: &[DomainEvent]) {
    let mut prompted = false;
    for event in events {
        if matches!(event, DomainEvent::AuthRequired { .. }) {
            if prompted {
                continue;
            }
            prompted = true;
        }
        match describe(event) {
            Some((Stream::Stdout, line)) => println!("{}", line),
            Some((Stream::Stderr, line)) => eprintln!("{}", line),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_streams() {
        assert_eq!(
            describe(&DomainEvent::info("Group deleted successfully")),
            Some((Stream::Stdout, "Group deleted successfully".to_string()))
        );
        assert_eq!(
            describe(&DomainEvent::error("Error deleting group")).map(|(s, _)| s),
            Some(Stream::Stderr)
        );
    }

    #[test]
    fn test_auth_prompt_names_login_url() {
        let (stream, line) = describe(&DomainEvent::AuthRequired {
            login_url: "http://localhost:5000/login".into(),
        })
        .unwrap();
        assert_eq!(stream, Stream::Stderr);
        assert!(line.contains("http://localhost:5000/login"));
    }

    #[test]
    fn test_bookkeeping_events_are_silent() {
        assert!(describe(&DomainEvent::GroupsLoaded {
            count: 3,
            generation: 1
        })
        .is_none());
    }
}
