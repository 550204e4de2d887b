//! Resource listing
//!
//! Turns the output of `kubectl get` into an ordered list of records the
//! operator can pick from. Order is exactly kubectl's output order; the
//! selector's indices refer back into it.

use crate::config::ListingFormat;
use crate::error::Result;
use crate::kubectl::{CommandOutput, Kubectl};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Resource type meaning "every type"; listed names come back type-qualified
pub const ALL_RESOURCES: &str = "all";

/// Whether kubectl reports names as `kind/name` for this type argument
///
/// True for `all` and for comma-separated lists such as `pods,services`.
/// A bare name is ambiguous there, so the delete call must carry qualified
/// names and no type.
pub fn is_multi_type(resource_type: &str) -> bool {
    resource_type == ALL_RESOURCES || resource_type.contains(',')
}

/// What kubectl prints instead of a table when nothing matches
pub const NO_RESOURCES_PREFIX: &str = "No resources found";

/// One addressable resource returned by the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Name as the delete call needs it
    pub name: String,
    /// Namespace, empty for cluster-scoped or unknown
    pub namespace: String,
    /// Line shown to the operator
    pub display_line: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
    List { items: Vec<KubeObject> },
    Single(KubeObject),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KubeObject {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    metadata: ObjectMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMeta {
    #[serde(default)]
    name: String,
    #[serde(default)]
    namespace: String,
    creation_timestamp: Option<DateTime<Utc>>,
}

impl KubeObject {
    /// `kind[.group]/name`, the form `kubectl delete` accepts without a type
    fn qualified_name(&self) -> String {
        if self.kind.is_empty() {
            return self.metadata.name.clone();
        }
        let kind = self.kind.to_lowercase();
        match self.api_version.split_once('/') {
            Some((group, _)) if !group.is_empty() => {
                format!("{}.{}/{}", kind, group, self.metadata.name)
            }
            _ => format!("{}/{}", kind, self.metadata.name),
        }
    }
}

/// Kubernetes style short age: `45s`, `7m30s`, `12m`, `3h`, `5d`, `2y`
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created).num_seconds();
    if seconds < -1 {
        return "<invalid>".to_string();
    }
    let seconds = seconds.max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let years = days / 365;

    if seconds < 60 * 2 {
        format!("{}s", seconds)
    } else if minutes < 10 {
        match seconds % 60 {
            0 => format!("{}m", minutes),
            s => format!("{}m{}s", minutes, s),
        }
    } else if minutes < 60 * 3 {
        format!("{}m", minutes)
    } else if hours < 8 {
        match minutes % 60 {
            0 => format!("{}h", hours),
            m => format!("{}h{}m", hours, m),
        }
    } else if hours < 48 {
        format!("{}h", hours)
    } else if hours < 24 * 8 {
        match hours % 24 {
            0 => format!("{}d", days),
            h => format!("{}d{}h", days, h),
        }
    } else if days < 365 * 2 {
        format!("{}d", days)
    } else if days < 365 * 8 {
        match days % 365 {
            0 => format!("{}y", years),
            d => format!("{}y{}d", years, d),
        }
    } else {
        format!("{}y", years)
    }
}

/// Parse `kubectl get -ojson` output
///
/// Names are type-qualified when listing several types at once.
pub fn parse_json(
    stdout: &str,
    resource_type: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ResourceRecord>> {
    let objects = match serde_json::from_str::<Listing>(stdout)? {
        Listing::List { items } => items,
        Listing::Single(object) => vec![object],
    };

    let qualify = is_multi_type(resource_type);
    let named: Vec<(String, KubeObject)> = objects
        .into_iter()
        .filter(|o| !o.metadata.name.is_empty())
        .map(|o| {
            let name = if qualify {
                o.qualified_name()
            } else {
                o.metadata.name.clone()
            };
            (name, o)
        })
        .collect();

    let width = named.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);

    Ok(named
        .into_iter()
        .map(|(name, object)| {
            let display_line = match object.metadata.creation_timestamp {
                Some(created) => {
                    format!("{:<width$}   {}", name, format_age(created, now), width = width)
                }
                None => name.clone(),
            };
            ResourceRecord {
                name,
                namespace: object.metadata.namespace,
                display_line,
            }
        })
        .collect())
}

/// Parse `kubectl get --no-headers` output
///
/// The name is the first column. Tables do not carry a namespace per line
/// in general, so every record gets the namespace the query was scoped to.
pub fn parse_table(stdout: &str, namespace: Option<&str>) -> Vec<ResourceRecord> {
    stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let name = line
                .trim_start()
                .split(char::is_whitespace)
                .next()
                .unwrap_or_default();
            ResourceRecord {
                name: name.to_string(),
                namespace: namespace.unwrap_or_default().to_string(),
                display_line: line.to_string(),
            }
        })
        .collect()
}

/// Arguments for the listing call
pub fn list_args(format: ListingFormat, resource_type: &str, modifiers: &[String]) -> Vec<String> {
    let output_flag = match format {
        ListingFormat::Json => "-ojson",
        ListingFormat::Text => "--no-headers",
    };
    let mut args = vec![
        "get".to_string(),
        output_flag.to_string(),
        resource_type.to_string(),
    ];
    args.extend(modifiers.iter().cloned());
    args
}

/// Turn captured listing output into records
pub fn parse_listing(
    format: ListingFormat,
    resource_type: &str,
    output: &CommandOutput,
    namespace: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Vec<ResourceRecord>> {
    if output.combined().trim_start().starts_with(NO_RESOURCES_PREFIX) {
        return Ok(Vec::new());
    }

    match format {
        ListingFormat::Json if output.stdout.trim().is_empty() => Ok(Vec::new()),
        ListingFormat::Json => parse_json(&output.stdout, resource_type, now),
        ListingFormat::Text => Ok(parse_table(&output.stdout, namespace)),
    }
}

/// List resources of `resource_type` through kubectl
pub fn list(
    kubectl: &Kubectl,
    format: ListingFormat,
    resource_type: &str,
    modifiers: &[String],
    namespace: Option<&str>,
) -> Result<Vec<ResourceRecord>> {
    let args = list_args(format, resource_type, modifiers);
    let output = kubectl.run_checked(&args)?;
    let records = parse_listing(format, resource_type, &output, namespace, Utc::now())?;
    debug!(count = records.len(), resource_type, "listed resources");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubectl::testing::{args, FakeRunner};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    const POD_LIST: &str = r#"{
        "apiVersion": "v1",
        "kind": "List",
        "items": [
            {"apiVersion": "v1", "kind": "Pod",
             "metadata": {"name": "web-7f9c", "namespace": "team-x",
                          "creationTimestamp": "2024-05-01T11:57:00Z"}},
            {"apiVersion": "v1", "kind": "Pod",
             "metadata": {"name": "db-0", "namespace": "team-x",
                          "creationTimestamp": "2024-04-26T12:00:00Z"}}
        ]
    }"#;

    #[test]
    fn test_format_age() {
        let n = now();
        assert_eq!(format_age(n - Duration::seconds(45), n), "45s");
        assert_eq!(format_age(n - Duration::seconds(450), n), "7m30s");
        assert_eq!(format_age(n - Duration::minutes(12), n), "12m");
        assert_eq!(format_age(n - Duration::hours(3), n), "3h");
        assert_eq!(format_age(n - Duration::hours(30), n), "30h");
        assert_eq!(format_age(n - Duration::days(5), n), "5d");
        assert_eq!(format_age(n - Duration::days(40), n), "40d");
        assert_eq!(format_age(n - Duration::days(730), n), "2y");
        assert_eq!(format_age(n + Duration::seconds(30), n), "<invalid>");
    }

    #[test]
    fn test_parse_json_preserves_order_and_namespace() {
        let records = parse_json(POD_LIST, "pods", now()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "web-7f9c");
        assert_eq!(records[1].name, "db-0");
        assert!(records.iter().all(|r| r.namespace == "team-x"));
        assert_eq!(records[0].display_line, "web-7f9c   3m");
        assert_eq!(records[1].display_line, "db-0       5d");
    }

    #[test]
    fn test_parse_json_qualifies_names_for_all() {
        let listing = r#"{"kind": "List", "items": [
            {"apiVersion": "v1", "kind": "Service", "metadata": {"name": "web"}},
            {"apiVersion": "apps/v1", "kind": "Deployment", "metadata": {"name": "web"}}
        ]}"#;
        let records = parse_json(listing, ALL_RESOURCES, now()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["service/web", "deployment.apps/web"]);
        assert_eq!(records[0].display_line, "service/web");
    }

    #[test]
    fn test_parse_json_qualifies_names_for_type_list() {
        let listing = r#"{"kind": "List", "items": [
            {"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "web"}},
            {"apiVersion": "v1", "kind": "Service", "metadata": {"name": "web"}}
        ]}"#;
        let records = parse_json(listing, "pods,services", now()).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pod/web", "service/web"]);
    }

    #[test]
    fn test_is_multi_type() {
        assert!(is_multi_type(ALL_RESOURCES));
        assert!(is_multi_type("pods,services"));
        assert!(!is_multi_type("pods"));
        assert!(!is_multi_type("deployments.apps"));
    }

    #[test]
    fn test_parse_json_single_object() {
        let object = r#"{"apiVersion": "v1", "kind": "ConfigMap",
                          "metadata": {"name": "settings", "namespace": "default"}}"#;
        let records = parse_json(object, "configmap", now()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "settings");
        assert_eq!(records[0].namespace, "default");
    }

    #[test]
    fn test_parse_json_empty_list() {
        let records = parse_json(r#"{"kind": "List", "items": []}"#, "pods", now()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_json_rejects_garbage() {
        let err = parse_json("error: not json", "pods", now()).unwrap_err();
        assert_eq!(err.category(), "json");
    }

    #[test]
    fn test_parse_table_takes_first_column() {
        let table = "pod-a   1/1   Running   0   3d\n\
                     pod-b   1/1   Running   2   1h\n\
                     \n\
                     pod-c\t0/1   Pending   0   5s\n";
        let records = parse_table(table, Some("team-x"));
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pod-a", "pod-b", "pod-c"]);
        assert_eq!(records[0].display_line, "pod-a   1/1   Running   0   3d");
        assert!(records.iter().all(|r| r.namespace == "team-x"));
    }

    #[test]
    fn test_parse_table_without_namespace() {
        let records = parse_table("node-1   Ready\n", None);
        assert_eq!(records[0].namespace, "");
    }

    #[test]
    fn test_no_resources_prefix_is_empty_not_error() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "No resources found in team-x namespace.\n".to_string(),
            code: Some(0),
        };
        let records =
            parse_listing(ListingFormat::Text, "pods", &output, Some("team-x"), now()).unwrap();
        assert!(records.is_empty());
        let records =
            parse_listing(ListingFormat::Json, "pods", &output, Some("team-x"), now()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_json_ignores_stderr_warnings() {
        let output = CommandOutput {
            stdout: POD_LIST.to_string(),
            stderr: "Warning: v1 ComponentStatus is deprecated\n".to_string(),
            code: Some(0),
        };
        let records = parse_listing(ListingFormat::Json, "pods", &output, None, now()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_list_invocation_and_idempotence() {
        let table = "pod-a   Running\npod-b   Running\n";
        let runner = FakeRunner::new(vec![
            CommandOutput::success(table),
            CommandOutput::success(table),
        ]);
        let kubectl = Kubectl::new("kubectl", &runner);
        let modifiers = args(&["-l", "app=web"]);

        let first = list(&kubectl, ListingFormat::Text, "pods", &modifiers, None).unwrap();
        let second = list(&kubectl, ListingFormat::Text, "pods", &modifiers, None).unwrap();
        assert_eq!(first, second);

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "kubectl");
        assert_eq!(calls[0].args, args(&["get", "--no-headers", "pods", "-l", "app=web"]));
    }

    #[test]
    fn test_list_json_args() {
        assert_eq!(
            list_args(ListingFormat::Json, "deployments", &args(&["-n", "x"])),
            args(&["get", "-ojson", "deployments", "-n", "x"])
        );
    }

    #[test]
    fn test_list_failure_is_fatal() {
        let runner = FakeRunner::new(vec![CommandOutput::failure(
            1,
            "error: the server doesn't have a resource type \"pdos\"",
        )]);
        let kubectl = Kubectl::new("kubectl", &runner);
        let err = list(&kubectl, ListingFormat::Json, "pdos", &[], None).unwrap_err();
        assert_eq!(err.category(), "external");
        assert!(err.to_string().contains("kubectl get -ojson pdos"));
        assert!(err.to_string().contains("pdos"));
    }
}
