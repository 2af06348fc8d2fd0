//! Driving port for publishing content.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Actor, Error, ServiceOutcome};

/// Publishing capability. The payload is opaque to this service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublishPort: Send + Sync {
    /// Publish the payload.
    async fn publish(
        &self,
        actor: &Actor,
        payload: Map<String, Value>,
    ) -> Result<ServiceOutcome, Error>;
}

/// Local strategy: nothing is published and the payload is echoed back.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPublish;

#[async_trait]
impl PublishPort for DisabledPublish {
    async fn publish(
        &self,
        _actor: &Actor,
        mut payload: Map<String, Value>,
    ) -> Result<ServiceOutcome, Error> {
        payload.insert("status".to_owned(), Value::String("disabled".to_owned()));
        Ok(ServiceOutcome::local(Value::Object(payload)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CallerIdentity;
    use serde_json::json;

    #[tokio::test]
    async fn disabled_publish_echoes_payload() {
        let Value::Object(payload) = json!({ "channel": "blog", "postId": "p1" }) else {
            panic!("object literal");
        };
        let outcome = DisabledPublish
            .publish(&Actor::new(CallerIdentity::anonymous(), None), payload)
            .await
            .expect("stub succeeds");
        assert_eq!(
            outcome.data,
            json!({ "status": "disabled", "channel": "blog", "postId": "p1" })
        );
    }
}
