//! Dispatch and capability reporting.
//!
//! The engine is the crate boundary: it maps a language identifier to its
//! adapter, rejects unknown ones before any filesystem or process work,
//! gates admission, and delegates to the pipeline. Every failure comes back
//! as a structured result; nothing propagates past this boundary under
//! normal operation.

mod pipeline;

use crate::config::types::{
    AvailabilityReport, Diagnostic, ExecutionRequest, ExecutionResult, Language, LanguageStatus,
    Recommendations, RunnerConfig,
};
use crate::lang::adapter_for;
use crate::probe::Prober;
use crate::supervisor::gate::AdmissionGate;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Instant;

/// Process execution engine. Cheap to share behind an `Arc`; all state is
/// internally synchronized.
pub struct Engine {
    config: RunnerConfig,
    prober: Prober,
    gate: AdmissionGate,
    availability: Mutex<Option<(Instant, AvailabilityReport)>>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(RunnerConfig::default())
    }
}

impl Engine {
    pub fn new(config: RunnerConfig) -> Self {
        let prober = Prober::new(config.probe_timeout);
        let gate = AdmissionGate::new(config.max_concurrency);
        Engine {
            config,
            prober,
            gate,
            availability: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute one request to a terminal result.
    ///
    /// Rejections (unknown language, empty/oversized source) happen before
    /// any scratch allocation or process spawn, and before admission, so a
    /// flood of bad requests cannot starve real work.
    pub fn execute(&self, request: &ExecutionRequest) -> ExecutionResult {
        if request.source.trim().is_empty() {
            return ExecutionResult::rejected(
                Diagnostic::InvalidRequest,
                "Source code must not be empty",
            );
        }
        if request.source.len() > self.config.max_source_bytes {
            return ExecutionResult::rejected(
                Diagnostic::InvalidRequest,
                format!(
                    "Source code exceeds the {} byte limit",
                    self.config.max_source_bytes
                ),
            );
        }

        let language: Language = match request.language.parse() {
            Ok(language) => language,
            Err(_) => {
                return ExecutionResult::rejected(
                    Diagnostic::UnsupportedLanguage,
                    format!("Unsupported language: {}", request.language),
                )
                .with_suggestions(vec![format!(
                    "Supported languages are: {}",
                    supported_list()
                )]);
            }
        };

        let _permit = self.gate.acquire();
        log::info!(
            "executing {} request ({} bytes of source)",
            language,
            request.source.len()
        );
        let result = pipeline::execute(
            adapter_for(language),
            &self.config,
            &self.prober,
            &request.source,
            &request.stdin,
        );
        log::info!(
            "{} execution finished: success={} diagnostic={:?} elapsed={}ms",
            language,
            result.success,
            result.diagnostic,
            result.elapsed_ms
        );
        result
    }

    /// Capability report, served from a TTL cache. Toolchain presence
    /// rarely changes within a process lifetime, so probing every call
    /// would only add latency.
    pub fn availability_report(&self) -> AvailabilityReport {
        let mut cached = self
            .availability
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((computed_at, report)) = cached.as_ref() {
            if computed_at.elapsed() < self.config.availability_ttl {
                return report.clone();
            }
        }
        let report = self.compute_availability();
        *cached = Some((Instant::now(), report.clone()));
        report
    }

    /// Recompute the capability report immediately, bypassing the cache.
    pub fn refresh_availability(&self) -> AvailabilityReport {
        let report = self.compute_availability();
        let mut cached = self
            .availability
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = Some((Instant::now(), report.clone()));
        report
    }

    fn compute_availability(&self) -> AvailabilityReport {
        let mut languages = BTreeMap::new();
        for language in Language::all() {
            let adapter = adapter_for(language);
            let available = adapter
                .required_tools()
                .iter()
                .all(|group| self.prober.resolve(group).is_some());
            languages.insert(
                language,
                LanguageStatus {
                    available,
                    platform: if available { "server" } else { "none" }.to_string(),
                    description: adapter.description().to_string(),
                    note: if available {
                        "Native server-side execution".to_string()
                    } else {
                        adapter.missing_message().to_string()
                    },
                },
            );
        }

        let supported: Vec<Language> = languages
            .iter()
            .filter(|(_, status)| status.available)
            .map(|(language, _)| *language)
            .collect();
        let unsupported: Vec<Language> = languages
            .iter()
            .filter(|(_, status)| !status.available)
            .map(|(language, _)| *language)
            .collect();
        let alternatives = if supported.len() < 2 {
            "Consider using Replit, CodePen, or other online IDEs for full language support"
        } else {
            "Most languages available for execution"
        }
        .to_string();

        AvailabilityReport {
            platform: std::env::consts::OS.to_string(),
            languages,
            recommendations: Recommendations {
                supported,
                unsupported,
                alternatives,
            },
        }
    }
}

fn supported_list() -> String {
    Language::all()
        .iter()
        .map(Language::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_scratch(scratch: std::path::PathBuf) -> Engine {
        Engine::new(RunnerConfig {
            scratch_root: scratch,
            ..Default::default()
        })
    }

    #[test]
    fn unsupported_language_is_rejected_without_side_effects() {
        let base = tempfile::tempdir().unwrap();
        let scratch = base.path().join("scratch");
        let engine = engine_with_scratch(scratch.clone());

        let result = engine.execute(&ExecutionRequest::new("print(1)", "brainfuck"));
        assert!(!result.success);
        assert_eq!(result.diagnostic, Some(Diagnostic::UnsupportedLanguage));
        assert!(result.stderr.contains("brainfuck"));
        assert!(result.suggestions[0].contains("javascript"));
        // No scratch directory was created, let alone written to.
        assert!(!scratch.exists());
    }

    #[test]
    fn empty_source_is_rejected_before_any_work() {
        let base = tempfile::tempdir().unwrap();
        let scratch = base.path().join("scratch");
        let engine = engine_with_scratch(scratch.clone());

        let result = engine.execute(&ExecutionRequest::new("   \n", "python"));
        assert_eq!(result.diagnostic, Some(Diagnostic::InvalidRequest));
        assert!(!scratch.exists());
    }

    #[test]
    fn oversized_source_is_rejected() {
        let base = tempfile::tempdir().unwrap();
        let engine = engine_with_scratch(base.path().join("scratch"));

        let huge = "x = 0\n".repeat(20_000);
        assert!(huge.len() > engine.config().max_source_bytes);
        let result = engine.execute(&ExecutionRequest::new(huge, "python"));
        assert_eq!(result.diagnostic, Some(Diagnostic::InvalidRequest));
        assert!(result.stderr.contains("byte limit"));
    }

    #[test]
    fn availability_report_covers_every_language() {
        let base = tempfile::tempdir().unwrap();
        let engine = engine_with_scratch(base.path().join("scratch"));

        let report = engine.refresh_availability();
        assert_eq!(report.languages.len(), Language::all().len());
        let total =
            report.recommendations.supported.len() + report.recommendations.unsupported.len();
        assert_eq!(total, Language::all().len());
    }

    #[test]
    fn availability_report_is_cached_within_ttl() {
        let base = tempfile::tempdir().unwrap();
        let engine = engine_with_scratch(base.path().join("scratch"));

        let first = engine.availability_report();
        // Second call within the TTL must come from cache, not a re-probe;
        // equality of the computed structure is the observable contract.
        let second = engine.availability_report();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
