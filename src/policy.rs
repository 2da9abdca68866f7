//! Parsing of `crossdomain.xml` trust declarations.
//!
//! The policy file is semi-trusted input served by arbitrary hosts, so the
//! parser is strictly defensive: unknown elements are ignored, missing or
//! empty `domain` attributes are skipped, and a document that is not
//! well-formed XML yields no rules while being flagged as malformed, a
//! distinct outcome from "valid policy with no rules", so the coordinator
//! can log the two differently. `roxmltree` does not resolve external
//! entities or fetch DTDs, which is exactly the posture wanted here.

use crate::fetcher::{FetchStatus, PolicyDocument};

/// The verbatim wildcard token a policy may grant.
pub const WILDCARD: &str = "*";

/// Elements whose `domain` attribute declares a trust relationship.
const TRUST_ELEMENTS: [&str; 2] = ["allow-access-from", "allow-http-request-headers-from"];

/// One declared trust relationship: the scanned domain trusts
/// `target_pattern`, which is either the literal `*` token (kept verbatim,
/// never expanded) or a concrete domain/host pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustRule {
    pub source_domain: String,
    pub target_pattern: String,
}

impl TrustRule {
    pub fn is_wildcard(&self) -> bool {
        self.target_pattern == WILDCARD
    }
}

/// Parser outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Possibly-empty rule set extracted from a well-formed document
    /// (or the empty set for a document that was never fetched).
    Rules(Vec<TrustRule>),
    /// The body was present but not well-formed XML.
    Malformed,
}

/// Extract trust rules from a fetched policy document.
///
/// Documents with a non-`Ok` fetch status produce the empty rule set:
/// no rules, no error; the fetch status already tells the story.
pub fn parse(doc: &PolicyDocument) -> ParseOutcome {
    if doc.status != FetchStatus::Ok {
        return ParseOutcome::Rules(Vec::new());
    }

    let tree = match roxmltree::Document::parse(&doc.body) {
        Ok(tree) => tree,
        Err(_) => return ParseOutcome::Malformed,
    };

    let mut rules = Vec::new();
    for node in tree.root().descendants().filter(|n| n.is_element()) {
        if !TRUST_ELEMENTS.contains(&node.tag_name().name()) {
            continue;
        }
        let Some(target) = node.attribute("domain") else {
            continue;
        };
        let target = target.trim();
        if target.is_empty() {
            continue;
        }
        rules.push(TrustRule {
            source_domain: doc.domain.clone(),
            target_pattern: target.to_string(),
        });
    }
    ParseOutcome::Rules(rules)
}
