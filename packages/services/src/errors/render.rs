use std::io::{self, Write};

use serde::{Serialize, Serializer};

use super::collection::ErrorCollection;

#[derive(Serialize)]
struct JsonPayload<'a> {
    error: bool,
    errors: Vec<&'a str>,
}

impl ErrorCollection {
    /// `<ul class="ccm-error"><li>...</li></ul>`, or `None` when there are no errors.
    ///
    /// Messages are HTML-escaped.
    pub fn render_html(&self) -> Option<String> {
        if !self.has() {
            return None;
        }

        let mut html = String::from("<ul class=\"ccm-error\">");
        for message in self.iter() {
            html.push_str("<li>");
            html.push_str(&escape_html(message));
            html.push_str("</li>");
        }
        html.push_str("</ul>");
        Some(html)
    }

    /// `{"error":true,"errors":[...]}`, or `None` when there are no errors.
    pub fn render_json(&self) -> Option<String> {
        if !self.has() {
            return None;
        }
        serde_json::to_string(self).ok()
    }

    /// Writes the HTML rendering; writes nothing when empty.
    pub fn output_html<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.render_html() {
            Some(html) => out.write_all(html.as_bytes()),
            None => Ok(()),
        }
    }

    /// Writes the JSON rendering; writes nothing when empty.
    pub fn output_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.render_json() {
            Some(body) => out.write_all(body.as_bytes()),
            None => Ok(()),
        }
    }
}

/// Serializes as `{"error":true,"errors":[...]}`, or `null` when empty.
impl Serialize for ErrorCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.has() {
            return serializer.serialize_none();
        }
        JsonPayload {
            error: true,
            errors: self.iter().collect(),
        }
        .serialize(serializer)
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ErrorCollection {
        vec!["A", "B"].into_iter().collect()
    }

    #[test]
    fn test_render_html() {
        assert_eq!(
            sample().render_html().as_deref(),
            Some("<ul class=\"ccm-error\"><li>A</li><li>B</li></ul>")
        );
    }

    #[test]
    fn test_render_html_escapes_messages() {
        let mut errors = ErrorCollection::new();
        errors.add("<script>alert('x')</script> & more");

        assert_eq!(
            errors.render_html().as_deref(),
            Some("<ul class=\"ccm-error\"><li>&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt; &amp; more</li></ul>")
        );
    }

    #[test]
    fn test_render_json() {
        assert_eq!(
            sample().render_json().as_deref(),
            Some(r#"{"error":true,"errors":["A","B"]}"#)
        );
    }

    #[test]
    fn test_render_json_matches_serialize() {
        let mut errors = sample();
        errors.set("email", "Quote \" and <tag>");

        assert_eq!(errors.render_json(), Some(serde_json::to_string(&errors).unwrap()));
    }

    #[test]
    fn test_empty_renders_nothing() {
        let errors = ErrorCollection::new();
        assert_eq!(errors.render_html(), None);
        assert_eq!(errors.render_json(), None);

        let mut out = Vec::new();
        errors.output_html(&mut out).unwrap();
        errors.output_json(&mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_output_writes_to_stream() {
        let mut out = Vec::new();
        sample().output_json(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"error":true,"errors":["A","B"]}"#);

        let mut out = Vec::new();
        sample().output_html(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("<ul class=\"ccm-error\">"));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCollection::new()).unwrap(), "null");
        assert_eq!(
            serde_json::to_value(&sample()).unwrap(),
            json!({ "error": true, "errors": ["A", "B"] })
        );
    }

    #[test]
    fn test_serialize_inside_larger_payload() {
        let body = json!({ "field": "password", "result": sample() });
        assert_eq!(body["result"]["errors"][1], "B");
    }
}
