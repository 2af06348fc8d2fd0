//! Client-visible configuration.

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::respond::ok;
use crate::inbound::http::state::HttpState;

/// Return the flags the browser needs: the navigation-state experiment and
/// which capabilities are forwarded.
#[get("/client-config")]
pub async fn client_config(state: web::Data<HttpState>) -> HttpResponse {
    ok(state.client_flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CapabilityFlags, ClientFlags};
    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::{local_ports, read_json};
    use actix_web::{App, test};
    use serde_json::json;

    #[actix_web::test]
    async fn exposes_flags_in_envelope() {
        let flags = ClientFlags {
            nav_state_experiment: true,
            capabilities: CapabilityFlags {
                calendar: true,
                ..CapabilityFlags::default()
            },
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::new(local_ports(), flags)))
                .service(web::scope("/api/v1").service(client_config)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/client-config").to_request(),
        )
        .await;
        let body = read_json(res).await;
        assert_eq!(body["data"]["navStateExperiment"], true);
        assert_eq!(
            body["data"]["capabilities"],
            json!({ "calendar": true, "plans": false, "ideas": false, "publish": false })
        );
    }
}
