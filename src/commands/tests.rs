//! Command Integration Tests
//!
//! Exercises the HTTP transport and command wrappers against a mock server.

#[cfg(test)]
mod tests {
    use crate::commands::{self, GroceryPatch, HttpTransport};
    use crate::context::Session;
    use crate::error::GroceryError;
    use mockito::{Matcher, Server};
    use reqwest::Url;
    use serde_json::json;
    use std::time::Duration;

    fn transport_for(server: &Server) -> HttpTransport {
        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        HttpTransport::new(base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_groceries_sends_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/Groceries")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"Result":[{"Id":"a","Name":"Milk","Deleted":false,"Done":true},{"Id":"b","Name":"Eggs","Deleted":true}],"Count":2}"#,
            )
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        let records = commands::list_groceries(&transport, &session).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Milk");
        assert_eq!(records[1].deleted, Some(true));
        assert_eq!(records[1].done, None);
    }

    #[tokio::test]
    async fn test_create_grocery_posts_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/Groceries")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "Name": "Milk" })))
            .with_status(201)
            .with_body(r#"{"Result":{"Id":"new-id","CreatedAt":"2015-01-01T00:00:00.000Z"}}"#)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        let id = commands::create_grocery(&transport, &session, "Milk").await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, "new-id");
    }

    #[tokio::test]
    async fn test_update_grocery_puts_patch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/Groceries/a-1")
            .match_body(Matcher::Json(json!({ "Done": true })))
            .with_status(200)
            .with_body(r#"{"Result":1}"#)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        commands::update_grocery(&transport, &session, "a-1", GroceryPatch::done(true))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bulk_restore_sends_filter_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/Groceries")
            .match_header("x-everlive-filter", r#"{"Id":{"$in":["a","b"]}}"#)
            .match_body(Matcher::Json(json!({ "Deleted": false, "Done": false })))
            .with_status(200)
            .with_body(r#"{"Result":2}"#)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        let ids = vec!["a".to_string(), "b".to_string()];
        let updated = commands::update_groceries_in(&transport, &session, &ids, GroceryPatch::restore())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(updated, Some(2));
    }

    #[tokio::test]
    async fn test_forbidden_signs_out() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/Groceries")
            .with_status(403)
            .with_body(r#"{"message":"Invalid access token.","errorCode":301}"#)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("stale");
        let err = commands::list_groceries(&transport, &session).await.unwrap_err();

        assert!(matches!(err, GroceryError::AuthExpired { .. }));
        assert!(!session.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_server_error_keeps_session() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/Groceries")
            .with_status(500)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        let err = commands::list_groceries(&transport, &session).await.unwrap_err();

        match err {
            GroceryError::Http { status, status_text } => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(session.is_signed_in().await);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/Groceries")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let transport = transport_for(&server);
        let session = Session::with_token("tok");
        let err = commands::list_groceries(&transport, &session).await.unwrap_err();
        assert!(matches!(err, GroceryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_login_is_anonymous() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/oauth/token")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(json!({
                "username": "me@example.com",
                "password": "secret",
                "grant_type": "password"
            })))
            .with_status(200)
            .with_body(r#"{"Result":{"access_token":"fresh","token_type":"bearer"}}"#)
            .create_async()
            .await;

        let transport = transport_for(&server);
        let token = commands::login(&transport, "me@example.com", "secret").await.unwrap();

        mock.assert_async().await;
        assert_eq!(token, "fresh");
    }

    #[tokio::test]
    async fn test_register_and_reset_password() {
        let mut server = Server::new_async().await;
        let register = server
            .mock("POST", "/Users")
            .match_body(Matcher::Json(json!({
                "Username": "me@example.com",
                "Email": "me@example.com",
                "Password": "secret"
            })))
            .with_status(201)
            .with_body(r#"{"Result":{"Id":"u1"}}"#)
            .create_async()
            .await;
        let reset = server
            .mock("POST", "/Users/resetpassword")
            .match_body(Matcher::Json(json!({ "Email": "me@example.com" })))
            .with_status(204)
            .create_async()
            .await;

        let transport = transport_for(&server);
        commands::register(&transport, "me@example.com", "secret").await.unwrap();
        commands::reset_password(&transport, "me@example.com").await.unwrap();

        register.assert_async().await;
        reset.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let base = Url::parse("http://127.0.0.1:1/").unwrap();
        let transport = HttpTransport::new(base, Duration::from_secs(2)).unwrap();
        let session = Session::with_token("tok");

        let err = commands::list_groceries(&transport, &session).await.unwrap_err();
        assert!(matches!(err, GroceryError::Transport(_)));
    }
}
