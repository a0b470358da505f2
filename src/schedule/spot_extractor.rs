//! Scrapes availability out of the signup widget embedded in each schedule row.
//!
//! A typical fragment looks like:
//!
//! ```html
//! <a data-date="11/20/2020" class="descGXP" alt="11938371" href= "javascript://"11938371">Description</a><br>
//! <a class="signUpGXP" textmsg="10 SPOTS LEFT" alt="11938371" href="https://www.groupexpro.com/gxp/reservations/start/index/11938371/11/20/2020">Sign Up</a>
//! ```
//!
//! The description anchor is always malformed (a stray quoted id right after the
//! quoted `href` value). The parser runs with exact errors so that quirk can be told
//! apart by tokenizer state; every other parse error marks the fragment as broken.

use crate::schedule::error::MarkupError;
use crate::types::spot_record::SpotRecord;
use html5ever::driver::{self, ParseOpts};
use html5ever::tendril::TendrilSink;
use html5ever::tokenizer::TokenizerOpts;
use html5ever::{local_name, namespace_url, ns, QualName};
use scraper::{ElementRef, Html, HtmlTreeSink};

const ATTR_SPOTS_TEXT: &str = "textmsg";
const ATTR_CLASS_ID: &str = "alt";

/// Outcome of scraping one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotExtraction {
    /// At least one anchor carried both attributes. `candidates` counts them; the
    /// record comes from the last one.
    Found { record: SpotRecord, candidates: usize },
    /// No signup widget, i.e. reservations are turned off for the class.
    NoSignup,
    /// The markup produced parser errors beyond the known provider quirk.
    Malformed(MarkupError),
}

impl SpotExtraction {
    pub fn record(&self) -> Option<&SpotRecord> {
        match self {
            SpotExtraction::Found { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<SpotRecord> {
        match self {
            SpotExtraction::Found { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Extracts the `{textmsg, alt}` pair from a signup fragment.
///
/// Anchors are visited in document order and the last qualifying one wins.
///
/// ```
/// use gxp_spots::{extract_spots, SpotRecord};
///
/// let html = r#"<a class="signUpGXP" textmsg="10 SPOTS LEFT" alt="11938371">Sign Up</a>"#;
/// assert_eq!(
///     extract_spots(html).into_record(),
///     Some(SpotRecord::new("10 SPOTS LEFT", "11938371"))
/// );
/// ```
pub fn extract_spots(html: &str) -> SpotExtraction {
    let fragment = parse_fragment_exact(html);

    let messages = unexpected_parse_errors(fragment.errors.iter().map(|e| &**e));
    if !messages.is_empty() {
        return SpotExtraction::Malformed(MarkupError { messages });
    }

    let mut found: Option<SpotRecord> = None;
    let mut candidates = 0;
    for element in fragment.root_element().descendants().filter_map(ElementRef::wrap) {
        let value = element.value();
        if value.name() != "a" {
            continue;
        }
        if let (Some(text), Some(id)) = (value.attr(ATTR_SPOTS_TEXT), value.attr(ATTR_CLASS_ID)) {
            candidates += 1;
            found = Some(SpotRecord::new(text, id));
        }
    }

    match found {
        Some(record) => SpotExtraction::Found { record, candidates },
        None => SpotExtraction::NoSignup,
    }
}

fn parse_fragment_exact(html: &str) -> Html {
    let opts = ParseOpts {
        tokenizer: TokenizerOpts {
            exact_errors: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let parser = driver::parse_fragment(
        HtmlTreeSink::new(Html::new_fragment()),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    );
    parser.one(html)
}

const STRAY_AFTER_QUOTED_VALUE: &str = " in state AfterAttributeValueQuoted";

// The stray id after `href="javascript://"` reports one error leaving the quoted
// value, then one for the closing quote it drags into the new attribute name. Only
// that pair, in that order, is tolerated.
fn unexpected_parse_errors<'a>(errors: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut unexpected = Vec::new();
    let mut after_stray_value = false;
    for message in errors {
        if message.starts_with("Saw ") && message.ends_with(STRAY_AFTER_QUOTED_VALUE) {
            after_stray_value = true;
        } else if after_stray_value && message == "Saw \" in state AttributeName" {
            after_stray_value = false;
        } else {
            unexpected.push(message.to_string());
        }
    }
    unexpected
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER_FRAGMENT: &str = r#"<a data-date="11/20/2020" class="descGXP" alt="11938371" href= "javascript://"11938371">Description</a><br><a class="signUpGXP" textmsg="10 SPOTS LEFT" alt="11938371" href="https://www.groupexpro.com/gxp/reservations/start/index/11938371/11/20/2020">Sign Up</a>."#;

    #[test]
    fn test_single_anchor_fields_are_copied_exactly() {
        let html = r#"<a class="signUpGXP" textmsg="2 SPOTS LEFT" alt="555">Sign Up</a>"#;
        assert_eq!(
            extract_spots(html),
            SpotExtraction::Found {
                record: SpotRecord::new("2 SPOTS LEFT", "555"),
                candidates: 1
            }
        );
    }

    #[test]
    fn test_provider_fragment_with_known_quirk_parses() {
        let extraction = extract_spots(PROVIDER_FRAGMENT);
        assert_eq!(
            extraction.record(),
            Some(&SpotRecord::new("10 SPOTS LEFT", "11938371"))
        );
    }

    #[test]
    fn test_last_qualifying_anchor_wins() {
        let html = concat!(
            r#"<a textmsg="5 SPOTS LEFT" alt="100">Sign Up</a>"#,
            r#"<br><a textmsg="WAITLIST" alt="200">Waitlist</a>"#
        );
        assert_eq!(
            extract_spots(html),
            SpotExtraction::Found {
                record: SpotRecord::new("WAITLIST", "200"),
                candidates: 2
            }
        );
    }

    #[test]
    fn test_anchor_missing_one_attribute_does_not_qualify() {
        let html = concat!(
            r#"<a textmsg="5 SPOTS LEFT" alt="100">Sign Up</a>"#,
            r#"<a textmsg="ignored">no id</a><span textmsg="x" alt="y"></span>"#
        );
        assert_eq!(
            extract_spots(html).into_record(),
            Some(SpotRecord::new("5 SPOTS LEFT", "100"))
        );
    }

    #[test]
    fn test_no_signup_widget_is_empty_not_error() {
        let html = r#"<a class="descGXP" alt="11938371" href="javascript://">Description</a>"#;
        assert_eq!(extract_spots(html), SpotExtraction::NoSignup);
        assert_eq!(extract_spots(""), SpotExtraction::NoSignup);
    }

    #[test]
    fn test_structural_errors_mark_fragment_malformed() {
        let html = r#"<a textmsg="3 SPOTS LEFT" alt="7">Sign Up</a></div>"#;
        match extract_spots(html) {
            SpotExtraction::Malformed(error) => assert!(!error.messages.is_empty()),
            other => panic!("expected malformed markup, got {:?}", other),
        }
    }

    fn assert_malformed(html: &str) {
        match extract_spots(html) {
            SpotExtraction::Malformed(error) => assert!(!error.messages.is_empty()),
            other => panic!("expected malformed markup for {html:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_end_tag_is_malformed() {
        assert_malformed(r#"<a textmsg="5 SPOTS LEFT" alt="1">Sign Up</a></ p>"#);
    }

    #[test]
    fn test_attribute_without_name_is_malformed() {
        assert_malformed(r#"<a textmsg="5 SPOTS LEFT" alt="1">Sign Up</a><p =oops>"#);
    }

    #[test]
    fn test_duplicate_attribute_is_malformed() {
        assert_malformed(r#"<a textmsg="5 SPOTS LEFT" alt="1" alt="2">Sign Up</a>"#);
    }

    #[test]
    fn test_provider_quirk_raises_only_the_tolerated_pair() {
        let fragment = parse_fragment_exact(PROVIDER_FRAGMENT);
        assert_eq!(fragment.errors.len(), 2, "{:?}", fragment.errors);
        assert!(unexpected_parse_errors(fragment.errors.iter().map(|e| &**e)).is_empty());
    }

    #[test]
    fn test_quote_in_attribute_name_alone_is_not_tolerated() {
        assert_eq!(
            unexpected_parse_errors(["Saw \" in state AttributeName"]),
            vec!["Saw \" in state AttributeName".to_string()]
        );
        assert_eq!(
            unexpected_parse_errors([
                "Saw 1 in state AfterAttributeValueQuoted",
                "Saw \" in state AttributeName",
                "Saw \" in state AttributeName",
            ]),
            vec!["Saw \" in state AttributeName".to_string()]
        );
    }
}
