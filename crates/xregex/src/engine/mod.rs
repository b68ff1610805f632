// Regex engine
// Owns the token registry, the compiled-artifact and pattern caches, and the
// installed feature set. Every operation hangs off `Engine`.
mod engine_option;
mod features;
mod xre_error;
pub mod xre_limits;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;
use log::debug;

use crate::compiler::flags::NATIVE_FLAGS;
use crate::compiler::token_registry::{TokenContext, TokenOptions, TokenRegistry};
use crate::compiler::{compile_source, native_flags, register_builtin_tokens, sorted_flags};
use crate::pattern::{CompiledArtifact, MatchResult, Pattern};
pub use engine_option::EngineOption;
pub use features::{Feature, FeatureSet};
pub use xre_error::{ErrorKind, XRegexError, XResult};
use xre_limits::CACHE_INITIAL_CAPACITY;

type CacheKey = (String, String);

pub struct Engine {
    option: EngineOption,
    registry: RefCell<TokenRegistry>,
    artifacts: RefCell<AHashMap<CacheKey, Rc<CompiledArtifact>>>,
    patterns: RefCell<AHashMap<CacheKey, Pattern>>,
    features: Cell<FeatureSet>,
}

impl Engine {
    /// Create an engine with the built-in tokens registered.
    pub fn new(option: EngineOption) -> XResult<Self> {
        let mut registry = TokenRegistry::new();
        register_builtin_tokens(&mut registry, &option)?;
        Ok(Engine {
            option,
            registry: RefCell::new(registry),
            artifacts: RefCell::new(AHashMap::with_capacity(CACHE_INITIAL_CAPACITY)),
            patterns: RefCell::new(AHashMap::with_capacity(CACHE_INITIAL_CAPACITY)),
            features: Cell::new(FeatureSet::default()),
        })
    }

    pub fn option(&self) -> &EngineOption {
        &self.option
    }

    /// Compile an augmented pattern. Repeated calls with the same source and
    /// flags share one compiled artifact, each in a fresh `Pattern`.
    pub fn compile(&self, source: &str, flags: &str) -> XResult<Pattern> {
        Ok(Pattern::from_artifact(self.compile_artifact(source, flags)?))
    }

    pub(crate) fn compile_artifact(&self, source: &str, flags: &str) -> XResult<Rc<CompiledArtifact>> {
        let key = (source.to_string(), flags.to_string());
        if let Some(artifact) = self.artifacts.borrow().get(&key) {
            return Ok(artifact.clone());
        }

        // handlers may re-enter the engine, so no borrow survives past here
        let (rules, known_flags) = {
            let registry = self.registry.borrow();
            (registry.snapshot(), registry.known_flags().to_string())
        };
        let out = compile_source(source, flags, &rules, &known_flags, &self.option)?;
        debug!(
            "compiled {:?} with flags {:?}: /{}/{} ({} groups)",
            source,
            flags,
            out.native_source,
            out.native_flags,
            out.group_names.len()
        );
        let artifact = Rc::new(CompiledArtifact::build(
            out.native_source,
            out.native_flags,
            Some(out.group_names),
            Some(source.to_string()),
            Some(out.flags),
            &self.option,
        )?);
        self.artifacts.borrow_mut().insert(key, artifact.clone());
        Ok(artifact)
    }

    /// Build a pattern from native syntax, skipping augmented processing.
    pub fn native(&self, source: &str, flags: &str) -> XResult<Pattern> {
        for (i, c) in flags.char_indices() {
            if flags[..i].contains(c) {
                return Err(XRegexError::syntax(format!(
                    "Invalid duplicate regex flag {}",
                    flags
                )));
            }
            if !NATIVE_FLAGS.contains(c) {
                return Err(XRegexError::syntax(format!("Unknown regex flag {}", c)));
            }
        }
        let artifact = CompiledArtifact::build(
            source.to_string(),
            sorted_flags(flags),
            None,
            None,
            None,
            &self.option,
        )?;
        Ok(Pattern::from_artifact(Rc::new(artifact)))
    }

    /// Like `compile`, but repeated calls return the very same pattern object.
    pub fn cache(&self, source: &str, flags: &str) -> XResult<Pattern> {
        let key = (source.to_string(), flags.to_string());
        if let Some(pattern) = self.patterns.borrow().get(&key) {
            return Ok(pattern.clone());
        }
        let pattern = self.compile(source, flags)?;
        self.patterns.borrow_mut().insert(key, pattern.clone());
        Ok(pattern)
    }

    /// Drop every cached artifact and cached pattern. Patterns already handed
    /// out keep working.
    pub fn flush_cache(&self) {
        let artifacts = self.artifacts.borrow().len();
        let patterns = self.patterns.borrow().len();
        self.artifacts.borrow_mut().clear();
        self.patterns.borrow_mut().clear();
        debug!(
            "flushed {} cached artifacts and {} cached patterns",
            artifacts, patterns
        );
    }

    /// Copy `pattern` with flags added and removed. The native regex is reused
    /// when only `g` or `y` change.
    pub fn copy(&self, pattern: &Pattern, add_flags: &str, remove_flags: &str) -> XResult<Pattern> {
        let artifact = pattern.artifact();
        let edit = |base: &str| {
            let mut flags: String = base.chars().filter(|&c| !remove_flags.contains(c)).collect();
            for c in add_flags.chars() {
                if !flags.contains(c) {
                    flags.push(c);
                }
            }
            sorted_flags(&flags)
        };
        let new_native = native_flags(&edit(&artifact.native_flags));
        let xflags = artifact.flags.as_deref().map(edit);

        let strip_gy = |flags: &str| flags.replace(['g', 'y'], "");
        let copied = if strip_gy(&new_native) == strip_gy(&artifact.native_flags) {
            artifact.with_flags(new_native, xflags)
        } else {
            CompiledArtifact::build(
                artifact.native_source.clone(),
                new_native,
                Some(artifact.group_names.to_vec()),
                artifact.source.clone(),
                xflags,
                &self.option,
            )?
        };
        Ok(Pattern::from_artifact(Rc::new(copied)))
    }

    /// New pattern with flag `g` and a cursor of 0.
    pub fn globalize(&self, pattern: &Pattern) -> XResult<Pattern> {
        self.copy(pattern, "g", "")
    }

    /// Recompile `pattern` in place. Other handles to it see the new pattern,
    /// and its cursor restarts at 0.
    pub fn recompile(&self, pattern: &Pattern, source: &str, flags: &str) -> XResult<()> {
        let artifact = self.compile_artifact(source, flags)?;
        pattern.replace_artifact(artifact);
        Ok(())
    }

    /// Add a token rule. It takes precedence over every rule registered
    /// before it.
    pub fn register_token<F>(&self, matcher: &Pattern, handler: F, options: TokenOptions) -> XResult<()>
    where
        F: Fn(&MatchResult, &mut TokenContext<'_>) -> XResult<Option<String>> + 'static,
    {
        self.registry
            .borrow_mut()
            .register(matcher.artifact(), Rc::new(handler), options)?;
        debug!(
            "registered token {:?} ({} rules)",
            matcher,
            self.registry.borrow().len()
        );
        self.flush_cache();
        Ok(())
    }

    /// Install space- or comma-separated features. Unknown names are ignored.
    pub fn install_feature(&self, names: &str) {
        let mut set = self.features.get();
        for feature in FeatureSet::parse_list(names) {
            set.insert(feature);
        }
        self.features.set(set);
    }

    pub fn uninstall_feature(&self, names: &str) {
        let mut set = self.features.get();
        for feature in FeatureSet::parse_list(names) {
            set.remove(feature);
        }
        self.features.set(set);
    }

    pub fn is_feature_installed(&self, name: &str) -> bool {
        Feature::from_name(name).is_some_and(|f| self.features.get().contains(f))
    }

    pub(crate) fn namespaced(&self) -> bool {
        self.features.get().contains(Feature::Namespacing)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("option", &self.option)
            .field("rules", &self.registry.borrow().len())
            .field("cached_artifacts", &self.artifacts.borrow().len())
            .field("features", &self.features.get())
            .finish()
    }
}
