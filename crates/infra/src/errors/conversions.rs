//! Classification of foreign errors for logs and error messages.

use reqwest::Error as HttpError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error                                                             */
/* -------------------------------------------------------------------------- */

/// Short, stable label for a reqwest failure
pub fn describe_reqwest_error(err: &HttpError) -> &'static str {
    if err.is_timeout() {
        return "timeout";
    }
    if err.is_connect() {
        return "connect";
    }
    if err.is_builder() {
        return "invalid request";
    }
    if err.is_redirect() {
        return "redirect";
    }
    if err.is_body() {
        return "body";
    }
    if err.is_decode() {
        return "decode";
    }
    if err.is_status() {
        return "status";
    }
    "request"
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::time::Duration;

    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn refused_connection_is_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = Client::new().get(format!("http://{addr}")).send().await.unwrap_err();
        assert_eq!(describe_reqwest_error(&err), "connect");
    }

    #[tokio::test]
    async fn slow_response_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = Client::builder().timeout(Duration::from_millis(50)).build().unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        assert_eq!(describe_reqwest_error(&err), "timeout");
    }

    #[test]
    fn malformed_url_is_invalid_request() {
        let err = Client::new().get("not a url").build().unwrap_err();
        assert_eq!(describe_reqwest_error(&err), "invalid request");
    }
}
