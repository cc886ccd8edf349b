use std::time::Duration;

use bigdecimal::BigDecimal;
use reqwest::blocking::Client;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::errors::TransportError;
use crate::domain::ports::InventoryAuthority;

/// Product payload as served by the inventory service. Only the fields the
/// coordinator consumes are deserialized.
#[derive(Debug, Deserialize)]
struct ProductPayload {
    price: BigDecimal,
    quantity: i32,
}

/// HTTP client for the remote inventory service.
///
/// Every request shares one finite timeout so no coordinator operation can
/// block on the authority indefinitely. Non-2xx responses and IO failures
/// both collapse into `TransportError`; the only business answer modelled is
/// the boolean body of the availability check.
pub struct HttpInventoryAuthority {
    base_url: String,
    http: Client,
}

impl HttpInventoryAuthority {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, TransportError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| TransportError(format!("GET {url}: {e}")))?;
        Self::decode(url, response)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<T, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError(format!("{url}: HTTP {status}")));
        }
        response
            .json()
            .map_err(|e| TransportError(format!("{url}: invalid body: {e}")))
    }
}

impl InventoryAuthority for HttpInventoryAuthority {
    fn check_availability(&self, product_id: Uuid, quantity: i32) -> Result<bool, TransportError> {
        let url = format!(
            "{}/inventory/products/{}/check-availability?quantity={}",
            self.base_url, product_id, quantity
        );
        self.get_json(&url)
    }

    fn current_price(&self, product_id: Uuid) -> Result<BigDecimal, TransportError> {
        let url = format!("{}/api/products/{}", self.base_url, product_id);
        let product: ProductPayload = self.get_json(&url)?;
        Ok(product.price)
    }

    fn adjust_quantity(&self, product_id: Uuid, delta: i32) -> Result<i32, TransportError> {
        let url = format!(
            "{}/inventory/products/{}/update-quantity?delta={}",
            self.base_url, product_id, delta
        );
        let response = self
            .http
            .post(&url)
            .send()
            .map_err(|e| TransportError(format!("POST {url}: {e}")))?;
        let product: ProductPayload = Self::decode(&url, response)?;
        Ok(product.quantity)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::HttpInventoryAuthority;
    use crate::domain::ports::InventoryAuthority;

    /// Bind to port 0 to let the OS assign a free port, then release it so
    /// nothing is listening there.
    fn unreachable_base_url() -> String {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .expect("bind failed")
            .local_addr()
            .expect("addr failed")
            .port();
        format!("http://127.0.0.1:{port}")
    }

    fn client(base_url: &str) -> HttpInventoryAuthority {
        HttpInventoryAuthority::new(base_url, Duration::from_millis(250)).expect("client build")
    }

    #[test]
    fn availability_check_against_unreachable_host_is_a_transport_error() {
        let authority = client(&unreachable_base_url());

        let err = authority
            .check_availability(Uuid::new_v4(), 1)
            .expect_err("no listener, call must fail");

        assert!(err.0.contains("check-availability"));
    }

    #[test]
    fn price_lookup_against_unreachable_host_is_a_transport_error() {
        let authority = client(&unreachable_base_url());

        assert!(authority.current_price(Uuid::new_v4()).is_err());
    }

    #[test]
    fn adjustment_against_unreachable_host_is_a_transport_error() {
        let authority = client(&unreachable_base_url());

        assert!(authority.adjust_quantity(Uuid::new_v4(), -2).is_err());
    }

    #[test]
    fn trailing_slash_in_base_url_is_normalized() {
        let authority = client("http://127.0.0.1:1/");

        assert_eq!(authority.base_url, "http://127.0.0.1:1");
    }
}
