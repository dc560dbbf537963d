//! The client's upgrade request: path and query parameters.

use serde::de::DeserializeOwned;

/// The path and raw query string a connection was opened with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeRequest {
    path: String,
    query: Option<String>,
}

impl UpgradeRequest {
    /// Creates a request from a path and an optional raw query string
    /// (without the leading `?`).
    pub fn new(path: impl Into<String>, query: Option<String>) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// The request path, e.g. `/ws`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Deserializes the query string into `T`.
    ///
    /// The query is `application/x-www-form-urlencoded`. A request without
    /// one parses as an empty query, so `T` should use `Option` fields for
    /// parameters the client may leave out.
    ///
    /// ```
    /// use serde::Deserialize;
    /// use ultimate_transport::UpgradeRequest;
    ///
    /// #[derive(Deserialize)]
    /// #[serde(rename_all = "camelCase")]
    /// struct Params {
    ///     player_name: Option<String>,
    /// }
    ///
    /// let request = UpgradeRequest::new("/ws", Some("playerName=Bob+B".into()));
    /// let params: Params = request.params().unwrap();
    /// assert_eq!(params.player_name.as_deref(), Some("Bob B"));
    /// ```
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Params {
        lobby_id: Option<i32>,
        player_name: Option<String>,
    }

    fn req(query: &str) -> UpgradeRequest {
        UpgradeRequest::new("/ws", Some(query.to_string()))
    }

    #[test]
    fn test_typed_params() {
        let params: Params = req("lobbyId=12&playerName=Alice").params().unwrap();
        assert_eq!(params.lobby_id, Some(12));
        assert_eq!(params.player_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_missing_params_are_none() {
        let params: Params = req("other=1").params().unwrap();
        assert_eq!(
            params,
            Params {
                lobby_id: None,
                player_name: None
            }
        );
    }

    #[test]
    fn test_percent_decoding() {
        let params: HashMap<String, String> =
            req("playerName=Ana%20Mar%C3%ADa&other=a+b").params().unwrap();
        assert_eq!(params["playerName"], "Ana María");
        assert_eq!(params["other"], "a b");
    }

    #[test]
    fn test_bad_escape_is_kept_literally() {
        let params: HashMap<String, String> = req("a=%zz&b=x%+1&c=%4").params().unwrap();
        assert_eq!(params["a"], "%zz");
        // `+` is a space before escapes are read, so `%+1` is no escape.
        assert_eq!(params["b"], "x% 1");
        assert_eq!(params["c"], "%4");
    }

    #[test]
    fn test_param_without_value_is_empty() {
        let params: Params = req("playerName&lobbyId=7").params().unwrap();
        assert_eq!(params.player_name.as_deref(), Some(""));
        assert_eq!(params.lobby_id, Some(7));
    }

    #[test]
    fn test_non_numeric_value_is_an_error() {
        assert!(req("lobbyId=abc").params::<Params>().is_err());
        assert!(req("lobbyId=").params::<Params>().is_err());
    }

    #[test]
    fn test_no_query() {
        let r = UpgradeRequest::new("/control", None);
        assert_eq!(r.path(), "/control");
        let params: Params = r.params().unwrap();
        assert_eq!(params.lobby_id, None);
    }
}
