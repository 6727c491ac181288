use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;

use super::UpstreamError;
use crate::models::ImageResult;

// Seam for the image-search upstream so handlers can run against a mock
#[async_trait]
pub trait UnsplashApi: Send + Sync {
    async fn search_photos(&self, query: &str) -> Result<Option<ImageResult>, UpstreamError>;
    async fn trigger_download(&self, download_location: &str) -> Result<(), UpstreamError>;
}

pub struct UnsplashClient {
    access_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl UnsplashClient {
    pub fn new(access_key: String, base_url: String, timeout: Duration) -> Self {
        Self {
            access_key,
            base_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search/photos", self.base_url.trim_end_matches('/'))
    }

    fn auth_value(&self) -> String {
        format!("Client-ID {}", self.access_key)
    }

    fn search_request(&self, query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.search_url())
            .query(&[
                ("query", search_query(query).as_str()),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .header(AUTHORIZATION, self.auth_value())
            .timeout(self.timeout)
    }
}

// Bias the lookup toward food photography, matching how the recipe cards use it
fn search_query(query: &str) -> String {
    format!("{query} food dish")
}

// search/photos response, reduced to the fields the frontend needs
#[derive(Deserialize)]
struct SearchPhotosResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    id: String,
    urls: PhotoUrls,
    user: Photographer,
    #[serde(default)]
    links: PhotoLinks,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize)]
struct Photographer {
    name: String,
    links: PhotographerLinks,
}

#[derive(Deserialize)]
struct PhotographerLinks {
    html: String,
}

#[derive(Deserialize, Default)]
struct PhotoLinks {
    download_location: Option<String>,
}

impl Photo {
    fn into_result(self) -> ImageResult {
        ImageResult {
            id: self.id,
            url: self.urls.regular,
            photographer: self.user.name,
            photographer_url: self.user.links.html,
            download_location: self.links.download_location,
        }
    }
}

#[async_trait]
impl UnsplashApi for UnsplashClient {
    async fn search_photos(&self, query: &str) -> Result<Option<ImageResult>, UpstreamError> {
        let response = self.search_request(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let reply: SearchPhotosResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Parse(e.to_string()))?;

        Ok(reply.results.into_iter().next().map(Photo::into_result))
    }

    async fn trigger_download(&self, download_location: &str) -> Result<(), UpstreamError> {
        let response = self
            .client
            .get(download_location)
            .header(AUTHORIZATION, self.auth_value())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> UnsplashClient {
        UnsplashClient::new(
            "test-key".to_string(),
            "https://api.unsplash.com".to_string(),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn search_url_joins_base() {
        assert_eq!(client().search_url(), "https://api.unsplash.com/search/photos");

        let local = UnsplashClient::new(
            "test-key".to_string(),
            "http://localhost:9090/".to_string(),
            Duration::from_secs(10),
        );
        assert_eq!(local.search_url(), "http://localhost:9090/search/photos");
    }

    #[test]
    fn auth_value_uses_client_id_scheme() {
        assert_eq!(client().auth_value(), "Client-ID test-key");
    }

    #[test]
    fn search_query_biases_toward_food() {
        assert_eq!(search_query("carbonara"), "carbonara food dish");
    }

    #[test]
    fn search_request_carries_parameters_and_auth() {
        let request = client().search_request("pasta").build().unwrap();

        assert_eq!(request.url().host_str(), Some("api.unsplash.com"));
        assert_eq!(request.url().path(), "/search/photos");

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("query".to_string(), "pasta food dish".to_string())));
        assert!(pairs.contains(&("per_page".to_string(), "1".to_string())));
        assert!(pairs.contains(&("orientation".to_string(), "landscape".to_string())));

        let auth = request.headers()[AUTHORIZATION].to_str().unwrap();
        assert_eq!(auth, "Client-ID test-key");
    }

    #[test]
    fn photo_reshapes_into_image_result() {
        let reply: SearchPhotosResponse = serde_json::from_value(json!({
            "total": 1,
            "results": [{
                "id": "abc123",
                "urls": { "regular": "https://images.unsplash.com/photo-abc123", "small": "x" },
                "user": {
                    "name": "Jane Doe",
                    "links": { "html": "https://unsplash.com/@janedoe" }
                },
                "links": { "download_location": "https://api.unsplash.com/photos/abc123/download" }
            }]
        }))
        .unwrap();

        let hit = reply.results.into_iter().next().unwrap().into_result();
        assert_eq!(hit.id, "abc123");
        assert_eq!(hit.url, "https://images.unsplash.com/photo-abc123");
        assert_eq!(hit.photographer, "Jane Doe");
        assert_eq!(hit.photographer_url, "https://unsplash.com/@janedoe");
        assert_eq!(
            hit.download_location.as_deref(),
            Some("https://api.unsplash.com/photos/abc123/download")
        );
    }

    #[test]
    fn photo_without_links_still_parses() {
        let photo: Photo = serde_json::from_value(json!({
            "id": "abc123",
            "urls": { "regular": "https://images.unsplash.com/photo-abc123" },
            "user": { "name": "Jane Doe", "links": { "html": "https://unsplash.com/@janedoe" } }
        }))
        .unwrap();
        assert!(photo.into_result().download_location.is_none());
    }

    #[test]
    fn empty_results_yield_no_hit() {
        let reply: SearchPhotosResponse =
            serde_json::from_value(json!({ "total": 0, "results": [] })).unwrap();
        assert!(reply.results.into_iter().next().is_none());
    }
}
