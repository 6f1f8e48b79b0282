//! Request builders for OWS endpoint tests.

/// Builder for GetPrint query strings.
///
/// Fields are public so tests can tweak individual parameters; unset
/// options are omitted from the assembled query.
#[derive(Debug, Clone)]
pub struct GetPrintQuery {
    pub service: String,
    pub request: String,
    pub map: Option<String>,
    pub template: Option<String>,
    pub exp_filter: Option<String>,
    pub scale: Option<String>,
    pub scales: Option<String>,
    pub format: Option<String>,
    pub extras: Vec<(String, String)>,
}

impl GetPrintQuery {
    pub fn new(template: &str) -> Self {
        Self {
            service: "ATLAS".to_string(),
            request: "GetPrint".to_string(),
            map: None,
            template: Some(template.to_string()),
            exp_filter: None,
            scale: None,
            scales: None,
            format: None,
            extras: Vec::new(),
        }
    }

    /// Assemble the query string, percent-encoding every value.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = vec![
            ("SERVICE", self.service.as_str()),
            ("REQUEST", self.request.as_str()),
        ];
        if let Some(v) = &self.map {
            pairs.push(("MAP", v));
        }
        if let Some(v) = &self.template {
            pairs.push(("TEMPLATE", v));
        }
        if let Some(v) = &self.exp_filter {
            pairs.push(("EXP_FILTER", v));
        }
        if let Some(v) = &self.scale {
            pairs.push(("SCALE", v));
        }
        if let Some(v) = &self.scales {
            pairs.push(("SCALES", v));
        }
        if let Some(v) = &self.format {
            pairs.push(("FORMAT", v));
        }
        for (k, v) in &self.extras {
            pairs.push((k, v));
        }

        pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Percent-encode a query value so the assembled URI parses.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
