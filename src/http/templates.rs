//! HTML pages served by the appliance.

use std::fmt::Write;

pub const AUTH_FORM: &str = r#"
	<html>
		<form action="/authenticate" method=POST style="text-align: center;">
			<label for="auth">Enter auth:</label>
			<br>
			<input type="password" name="auth">
			<input type="submit" value="Submit">
		</form>
	</html>
"#;

pub const INCORRECT_AUTH: &str = "Incorrect authentication!";
pub const WAIT_BEFORE_RETRY: &str = "Please wait before trying again!";

/// Status message plus a link back to the form.
pub fn try_again(status: &str) -> String {
    format!(
        "\n\t<html>\n\t\t<p>{}</p>\n\t\t<a href=\"/auth\">Try again</a>\n\t</html>\n",
        escape_html(status)
    )
}

/// Render every record as a heading plus escaped, preformatted content.
pub fn log_list<I, S>(records: I) -> String
where
    I: IntoIterator<Item = (u64, S)>,
    S: AsRef<str>,
{
    let mut items = String::new();
    for (id, content) in records {
        // writing to a String cannot fail
        let _ = write!(
            items,
            "<h1>Request #{}</h1><pre>{}</pre><br><br>",
            id,
            escape_html(content.as_ref())
        );
    }
    format!("\n\t\t<html>\n\t\t\t{}\n\t\t</html>\n\t", items)
}

/// Neutralize `& < > ' "` so logged data cannot inject markup.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_the_five_characters() {
        assert_eq!(
            escape_html(r#"<a href='x'>"Tom" & Jerry</a>"#),
            "&lt;a href=&#39;x&#39;&gt;&quot;Tom&quot; &amp; Jerry&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn escaping_already_escaped_text_is_visible_not_decoded() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn log_list_orders_and_escapes() {
        let html = log_list(vec![(1, "<script>alert(1)</script>"), (3, "{}")]);
        assert!(html.contains("<h1>Request #1</h1><pre>&lt;script&gt;alert(1)&lt;/script&gt;</pre>"));
        assert!(!html.contains("<script>"));
        let first = html.find("Request #1").unwrap();
        let third = html.find("Request #3").unwrap();
        assert!(first < third);
    }

    #[test]
    fn empty_log_list_is_still_a_document() {
        let html = log_list(Vec::<(u64, String)>::new());
        assert!(html.contains("<html>"));
        assert!(!html.contains("<h1>"));
    }

    #[test]
    fn try_again_links_back_to_form() {
        let page = try_again(INCORRECT_AUTH);
        assert!(page.contains("<p>Incorrect authentication!</p>"));
        assert!(page.contains(r#"<a href="/auth">Try again</a>"#));
    }
}
