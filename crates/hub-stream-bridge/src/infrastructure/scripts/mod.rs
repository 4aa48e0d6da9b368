//! Proxy Script Generation
//!
//! Produces, per service URL, the client script embedding one
//! descriptor block per registered hub: method stubs, the ignore list
//! for the client's own member scan, and (for hubs exporting streams)
//! a multiplexed stream object the fixed push method routes into.
//!
//! The connection template is compiled into the binary; a missing
//! template is a packaging defect caught at build time. Generated
//! scripts are cached per service URL with an insert-if-absent store:
//! concurrent first-time generation may compute the script more than
//! once, but output is deterministic, so only one textually identical
//! value is ever retained.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::ports::{HubRegistry, NoopMinifier, ScriptMinifier};
use crate::domain::envelope::{EventKind, PUSH_METHOD};
use crate::domain::hubs::{HubDescriptor, MethodDescriptor};

/// Connection template with `{serviceUrl}` and `/*hubs*/` substitution
/// points.
static TEMPLATE: &str = include_str!("../../../templates/hubs.js");

/// Member names the client reserves on every hub descriptor.
const RESERVED_MEMBERS: [&str; 3] = ["namespace", "ignoreMembers", "callbacks"];

/// Member names the multiplexed stream object occupies.
const STREAM_MEMBERS: [&str; 3] = ["subject", PUSH_METHOD, "getObservable"];

// =============================================================================
// Script Cache
// =============================================================================

/// Process-wide cache of generated scripts, keyed by service URL
/// (compared ignoring case).
///
/// `insert_if_absent` is the only write path: the first stored value
/// wins and every caller observes it.
#[derive(Debug, Default)]
pub struct ScriptCache {
    entries: RwLock<HashMap<String, String>>,
}

impl ScriptCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached script for a service URL.
    #[must_use]
    pub fn get(&self, service_url: &str) -> Option<String> {
        self.entries
            .read()
            .get(&Self::key(service_url))
            .cloned()
    }

    /// Store a script unless one is already present; returns the
    /// retained value either way.
    pub fn insert_if_absent(&self, service_url: &str, script: String) -> String {
        self.entries
            .write()
            .entry(Self::key(service_url))
            .or_insert(script)
            .clone()
    }

    fn key(service_url: &str) -> String {
        service_url.to_lowercase()
    }
}

// =============================================================================
// Generator Configuration
// =============================================================================

/// Configuration for the proxy generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyGeneratorConfig {
    /// When enabled, the assembled script bypasses the minifier.
    pub debugging_enabled: bool,
}

// =============================================================================
// Proxy Generator
// =============================================================================

/// Generates the per-connection client proxy script.
///
/// For a fixed registry and service URL the output is byte-identical
/// across calls; a cache hit returns without touching the template or
/// the minifier.
pub struct ProxyGenerator {
    registry: Arc<dyn HubRegistry>,
    minifier: Arc<dyn ScriptMinifier>,
    cache: ScriptCache,
    config: ProxyGeneratorConfig,
}

impl ProxyGenerator {
    /// Create a generator over the given registry and minifier.
    pub fn new(
        registry: Arc<dyn HubRegistry>,
        minifier: Arc<dyn ScriptMinifier>,
        config: ProxyGeneratorConfig,
    ) -> Self {
        Self {
            registry,
            minifier,
            cache: ScriptCache::new(),
            config,
        }
    }

    /// Create a generator with a pass-through minifier and default
    /// configuration.
    pub fn with_defaults(registry: Arc<dyn HubRegistry>) -> Self {
        Self::new(
            registry,
            Arc::new(NoopMinifier),
            ProxyGeneratorConfig::default(),
        )
    }

    /// Generate (or fetch from cache) the proxy script for a service
    /// URL.
    #[must_use]
    pub fn generate_proxy(&self, service_url: &str) -> String {
        if let Some(script) = self.cache.get(service_url) {
            tracing::debug!(service_url, "proxy script cache hit");
            return script;
        }

        tracing::debug!(service_url, "generating proxy script");

        let mut hubs = String::new();
        for (index, hub) in self.registry.hubs().iter().enumerate() {
            if index > 0 {
                hubs.push_str(",\n        ");
            }
            emit_hub(&mut hubs, hub);
        }

        let script = TEMPLATE
            .replace("{serviceUrl}", service_url)
            .replace("/*hubs*/", &hubs);

        let script = if self.config.debugging_enabled {
            script
        } else {
            self.minifier.minify(&script)
        };

        self.cache.insert_if_absent(service_url, script)
    }
}

impl std::fmt::Debug for ProxyGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Emission
// =============================================================================

/// Resolve overloads: one method per name, fewest parameters wins,
/// first-seen declaration order preserved. A name without candidates
/// is omitted rather than failing the whole batch.
fn resolve_overloads(methods: &[MethodDescriptor]) -> Vec<MethodDescriptor> {
    let mut order: Vec<&str> = Vec::new();
    let mut best: HashMap<&str, &MethodDescriptor> = HashMap::new();

    for method in methods {
        match best.get(method.name()) {
            None => {
                order.push(method.name());
                best.insert(method.name(), method);
            }
            Some(current) if method.parameters().len() < current.parameters().len() => {
                best.insert(method.name(), method);
            }
            Some(_) => {}
        }
    }

    order
        .into_iter()
        .filter_map(|name| best.remove(name).cloned())
        .collect()
}

fn emit_hub(out: &mut String, hub: &HubDescriptor) {
    let key = camel_case(hub.name());
    let methods = resolve_overloads(hub.methods());

    let mut ignore: Vec<String> = methods.iter().map(|m| camel_case(m.name())).collect();
    if hub.has_streams() {
        ignore.extend(STREAM_MEMBERS.iter().map(ToString::to_string));
    }
    ignore.extend(RESERVED_MEMBERS.iter().map(ToString::to_string));
    let ignore_list = ignore
        .iter()
        .map(|member| format!("'{member}'"))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!("{key}: {{\n"));
    out.push_str("            _: {\n");
    out.push_str(&format!("                hubName: '{}',\n", hub.name()));
    out.push_str(&format!("                ignoreMembers: [{ignore_list}],\n"));
    out.push_str("                connection: function () { return signalR.hub; }\n");
    out.push_str("            }");

    if methods.is_empty() && !hub.has_streams() {
        out.push('\n');
    } else {
        out.push_str(",\n");
    }

    for (index, method) in methods.iter().enumerate() {
        if index > 0 {
            out.push_str(",\n");
        }
        emit_method(out, method);
    }

    if hub.has_streams() {
        if !methods.is_empty() {
            out.push_str(",\n");
        }
        emit_stream_subject(out, &key);
    }

    out.push('\n');
    out.push_str("        }");
}

fn emit_method(out: &mut String, method: &MethodDescriptor) {
    let mut parameters: Vec<String> = method.parameters().iter().map(|p| camel_case(p)).collect();
    parameters.push("callback".to_string());
    let parameter_list = parameters.join(", ");

    out.push_str(&format!(
        "            {}: function ({parameter_list}) {{\n",
        camel_case(method.name())
    ));
    out.push_str(&format!(
        "                return serverCall(this, \"{}\", $.makeArray(arguments));\n",
        method.name()
    ));
    out.push_str("            }");
}

/// The multiplexed stream object: a shared subject, the fixed push
/// method the envelope protocol routes into, and a factory returning a
/// per-event-name derived view.
fn emit_stream_subject(out: &mut String, hub_key: &str) {
    let on_next = EventKind::Next.as_str();
    let on_error = EventKind::Error.as_str();
    let on_completed = EventKind::Completed.as_str();

    out.push_str("            subject: new Rx.Subject(),\n");
    out.push_str(&format!(
        "            {PUSH_METHOD}: function (value) {{ signalR.{hub_key}.subject.onNext(value); }},\n"
    ));
    out.push_str("            getObservable: function (eventName) {\n");
    out.push_str("                return Rx.Observable.create(function (obs) {\n");
    out.push_str(&format!(
        "                    var disposable = signalR.{hub_key}.subject\n"
    ));
    out.push_str("                        .asObservable()\n");
    out.push_str(
        "                        .where(function (x) { return x.EventName.toLowerCase() === eventName.toLowerCase(); })\n",
    );
    out.push_str("                        .subscribe(function (x) {\n");
    out.push_str(&format!(
        "                            if (x.Type === '{on_next}') {{ obs.onNext(x.Data); }}\n"
    ));
    out.push_str(&format!(
        "                            if (x.Type === '{on_error}') {{ obs.onError(x.Data); }}\n"
    ));
    out.push_str(&format!(
        "                            if (x.Type === '{on_completed}') {{ obs.onCompleted(); }}\n"
    ));
    out.push_str("                        });\n");
    out.push_str("                    return disposable.dispose;\n");
    out.push_str("                });\n");
    out.push_str("            }");
}

/// Lower-case the first character, leaving the rest untouched.
fn camel_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}

// =============================================================================
// Tests
// =============================================================================
