//! Admin broadcast fan-out.
//!
//! Delivery is sequential and failure-tolerant: a blocked or deleted
//! account must not stop the blast or surface as an error, it just does not
//! count toward the tally.

use std::future::Future;

use teloxide::prelude::*;
use tracing::debug;

use fbot_models::UserRecord;

use crate::error::BotResult;

/// Direct-message delivery seam, implemented by the live bot handle and
/// stubbed in tests.
pub trait DirectSender {
    /// Deliver `text` to a single user.
    fn send_direct(&self, user_id: i64, text: &str) -> impl Future<Output = BotResult<()>> + Send;
}

impl DirectSender for Bot {
    fn send_direct(&self, user_id: i64, text: &str) -> impl Future<Output = BotResult<()>> + Send {
        let request = self.send_message(ChatId(user_id), text.to_string());
        async move {
            request.await?;
            Ok(())
        }
    }
}

/// Send `text` to every recipient, returning the number of successful
/// deliveries. Per-recipient failures are logged and skipped.
pub async fn fan_out<S: DirectSender>(sender: &S, recipients: &[UserRecord], text: &str) -> usize {
    let mut sent = 0usize;

    for user in recipients {
        match sender.send_direct(user.id, text).await {
            Ok(()) => sent += 1,
            Err(e) => {
                debug!(user_id = user.id, error = %e, "Broadcast delivery failed, skipping");
            }
        }
    }

    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use std::collections::HashSet;

    struct StubSender {
        fail_ids: HashSet<i64>,
    }

    impl DirectSender for StubSender {
        fn send_direct(
            &self,
            user_id: i64,
            _text: &str,
        ) -> impl Future<Output = BotResult<()>> + Send {
            let fail = self.fail_ids.contains(&user_id);
            async move {
                if fail {
                    Err(BotError::config("stubbed delivery failure"))
                } else {
                    Ok(())
                }
            }
        }
    }

    fn recipients(n: i64) -> Vec<UserRecord> {
        (0..n)
            .map(|id| UserRecord::new(id, Some("user"), Some("User")))
            .collect()
    }

    #[tokio::test]
    async fn test_fan_out_counts_successes() {
        let sender = StubSender {
            fail_ids: HashSet::new(),
        };
        assert_eq!(fan_out(&sender, &recipients(5), "hello").await, 5);
    }

    #[tokio::test]
    async fn test_fan_out_skips_failures_without_erroring() {
        let sender = StubSender {
            fail_ids: [1, 3].into_iter().collect(),
        };
        // 5 recipients, 2 fail: tally is N - M and iteration never stops.
        assert_eq!(fan_out(&sender, &recipients(5), "hello").await, 3);
    }

    #[tokio::test]
    async fn test_fan_out_over_empty_registry() {
        let sender = StubSender {
            fail_ids: HashSet::new(),
        };
        assert_eq!(fan_out(&sender, &[], "hello").await, 0);
    }
}
