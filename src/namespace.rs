//! Namespace recovery from query modifiers
//!
//! Textual listings do not say which namespace a line came from, so the
//! namespace the delete call needs is recovered from the flags the operator
//! passed to the listing. Listing across every namespace is refused: one
//! reconstructed delete call cannot span several of them.

use crate::error::{Error, Result};
use tracing::debug;

const SHORT_NAMESPACE: &str = "-n";
const LONG_NAMESPACE: &str = "--namespace";
const SHORT_ALL_NAMESPACES: &str = "-A";
const LONG_ALL_NAMESPACES: &str = "--all-namespaces";

/// Reject an all-namespaces request, in any spelling kubectl accepts
///
/// `--all-namespaces=false` is harmless and allowed through.
fn check_all_namespaces(modifier: &str) -> Result<()> {
    let requested = match modifier {
        SHORT_ALL_NAMESPACES | LONG_ALL_NAMESPACES => true,
        _ => match modifier.split_once('=') {
            Some((SHORT_ALL_NAMESPACES | LONG_ALL_NAMESPACES, value)) => value != "false",
            _ => false,
        },
    };

    if requested {
        Err(Error::AllNamespacesUnsupported {
            flag: modifier.to_string(),
        })
    } else {
        Ok(())
    }
}

/// Recover the namespace a run is scoped to
///
/// Returns `None` when no namespace flag is present, meaning kubectl's
/// ambient default applies. The first namespace flag wins.
pub fn analyze(modifiers: &[String]) -> Result<Option<String>> {
    for modifier in modifiers {
        check_all_namespaces(modifier)?;
    }

    let mut tokens = modifiers.iter();
    while let Some(token) = tokens.next() {
        let token = token.as_str();

        if token == SHORT_NAMESPACE || token == LONG_NAMESPACE {
            let value = tokens.next().ok_or_else(|| Error::MissingNamespaceValue {
                flag: token.to_string(),
            })?;
            debug!(namespace = %value, "namespace recovered from query");
            return Ok(Some(value.clone()));
        }

        if let Some((flag, value)) = token.split_once('=') {
            if flag == SHORT_NAMESPACE || flag == LONG_NAMESPACE {
                if value.is_empty() {
                    return Err(Error::MissingNamespaceValue {
                        flag: flag.to_string(),
                    });
                }
                debug!(namespace = %value, "namespace recovered from query");
                return Ok(Some(value.to_string()));
            }
        }
    }

    Ok(None)
}
