//! Recursive dependency resolution.
//!
//! Each [`Resolver::resolve`] call walks the dependency tree depth-first from
//! one root mod. Cycles are detected with a `visiting` set keyed by
//! `id@version`; resolved subtrees are memoized in a [`ResolutionCache`].
//! Version conflicts, incompatible pairs and loader mismatches are collected
//! on the returned [`DependencyGraph`] instead of failing the call.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use craftpack_core::config::{GlobalConfig, Strategy};
use craftpack_core::dependency::{Dependency, DependencyType, LoaderType};
use craftpack_core::manifest::Manifest;
use craftpack_core::mod_info::ModInfo;

use crate::cache::ResolutionCache;
use crate::conflict::{IncompatiblePair, LoaderConflict, VersionConflict};
use crate::constraint::parse_version_constraints;
use crate::error::{ProviderError, ResolutionError};
use crate::graph::{DependencyGraph, ResolvedDependency};
use crate::provider::MetadataProvider;
use crate::version::{parse_version, Version};

/// Knobs controlling a resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOptions {
    pub strategy: Strategy,
    pub include_optional: bool,
    /// `0` means unlimited.
    pub max_depth: usize,
    pub target_loader: Option<LoaderType>,
    /// Empty when the loader version is unknown.
    pub target_loader_version: String,
    pub minecraft_version: Option<String>,
    /// Share the resolver's cache across calls instead of a fresh one per call.
    pub reuse_cache: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Latest,
            include_optional: true,
            max_depth: 0,
            target_loader: None,
            target_loader_version: String::new(),
            minecraft_version: None,
            reuse_cache: true,
        }
    }
}

impl ResolutionOptions {
    /// Options from the global `[resolver]` section, targeted at the pack's
    /// loader and Minecraft version when a manifest is given.
    pub fn from_config(config: &GlobalConfig, manifest: Option<&Manifest>) -> Self {
        let resolver = &config.resolver;
        let mut options = Self {
            strategy: resolver.strategy,
            include_optional: resolver.include_optional,
            max_depth: resolver.max_depth,
            reuse_cache: resolver.reuse_cache,
            ..Self::default()
        };
        if let Some(manifest) = manifest {
            let package = &manifest.package;
            options.target_loader = package.loader;
            options.target_loader_version = package.loader_version.clone().unwrap_or_default();
            options.minecraft_version = package.minecraft.clone();
        }
        options
    }
}

/// Resolves mods against a [`MetadataProvider`].
///
/// A resolver may serve concurrent `resolve` calls; only the cache is shared
/// between them.
pub struct Resolver<P> {
    provider: P,
    options: ResolutionOptions,
    cache: ResolutionCache,
}

impl<P: MetadataProvider> Resolver<P> {
    pub fn new(provider: P, options: ResolutionOptions) -> Self {
        Self {
            provider,
            options,
            cache: ResolutionCache::new(),
        }
    }

    pub fn options(&self) -> &ResolutionOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Forget every memoized subtree.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Resolve `root_id` at `root_version` (`*` or empty for the newest).
    ///
    /// Fails on a cycle, or when the root or any required dependency cannot
    /// be found or carries an unparseable constraint. Everything else is
    /// reported on the graph.
    pub fn resolve(
        &self,
        root_id: &str,
        root_version: &str,
    ) -> Result<DependencyGraph, ResolutionError> {
        let wanted = root_version.trim();
        tracing::debug!("resolving {root_id}@{}", if wanted.is_empty() { "*" } else { wanted });

        let root_info = if wanted.is_empty() || wanted == "*" {
            self.provider.get_latest_version(root_id, "*")
        } else {
            self.provider.get_mod_info(root_id, wanted)
        }
        .map_err(provider_not_found)?;

        let local;
        let cache = if self.options.reuse_cache {
            &self.cache
        } else {
            local = ResolutionCache::new();
            &local
        };

        let mut session = Session::new(self, cache);
        let root = session.resolve_node(&root_info, DependencyType::Required, 0)?;

        let mut graph = DependencyGraph::new(root);
        graph.conflicts = session.version_conflicts(&graph.all_mods);
        graph.incompatibles = session.incompatibles;
        graph.loader_conflicts = session.loader_conflicts;
        tracing::debug!(
            "resolved {} with {} mods ({} problems)",
            root_info.key(),
            graph.len(),
            graph.errors().len()
        );
        Ok(graph)
    }

    /// Pick the version of `id` that satisfies `constraint`, by strategy.
    ///
    /// An empty or `*` constraint asks the provider for its latest version.
    pub fn find_best_version(&self, id: &str, constraint: &str) -> Result<ModInfo, ResolutionError> {
        let constraint = constraint.trim();
        if constraint.is_empty() || constraint == "*" {
            return self
                .provider
                .get_latest_version(id, "*")
                .map_err(provider_not_found);
        }

        let constraints = parse_version_constraints(constraint).map_err(|e| {
            ResolutionError::invalid_constraint(format!(
                "invalid constraint '{constraint}' on '{id}'"
            ))
            .with_details(e.message)
        })?;

        let candidates: Vec<ModInfo> = self
            .provider
            .get_all_versions(id)
            .map_err(provider_not_found)?
            .into_iter()
            .filter(|m| self.fits_minecraft(m))
            .filter(|m| parse_version(&m.version).is_ok_and(|v| constraints.matches_all(&v)))
            .collect();

        order_candidates(candidates, self.options.strategy)
            .into_iter()
            .next()
            .ok_or_else(|| {
                ResolutionError::not_found(format!("no version of '{id}' matches {constraints}"))
            })
    }

    fn fits_minecraft(&self, info: &ModInfo) -> bool {
        match &self.options.minecraft_version {
            Some(target) => info.minecraft_version.is_empty() || info.minecraft_version == *target,
            None => true,
        }
    }
}

fn provider_not_found(err: ProviderError) -> ResolutionError {
    ResolutionError::not_found(err.to_string())
}

/// Order candidates for selection: newest first for [`Strategy::Latest`],
/// oldest first for [`Strategy::Minimal`]. Unparseable versions go last.
pub fn order_candidates(candidates: Vec<ModInfo>, strategy: Strategy) -> Vec<ModInfo> {
    let mut keyed: Vec<(Option<Version>, ModInfo)> = candidates
        .into_iter()
        .map(|m| (parse_version(&m.version).ok(), m))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match strategy {
            Strategy::Latest => b.cmp(a),
            Strategy::Minimal => a.cmp(b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, m)| m).collect()
}

/// One dependency edge that was resolved successfully.
struct Request {
    requester: String,
    constraint: String,
    version: String,
}

/// State of a single `resolve` call.
struct Session<'a, P> {
    resolver: &'a Resolver<P>,
    cache: &'a ResolutionCache,
    visiting: HashSet<String>,
    path: Vec<String>,
    visited: HashSet<String>,
    requests: BTreeMap<String, Vec<Request>>,
    incompatibles: Vec<IncompatiblePair>,
    loader_conflicts: Vec<LoaderConflict>,
}

impl<'a, P: MetadataProvider> Session<'a, P> {
    fn new(resolver: &'a Resolver<P>, cache: &'a ResolutionCache) -> Self {
        Self {
            resolver,
            cache,
            visiting: HashSet::new(),
            path: Vec::new(),
            visited: HashSet::new(),
            requests: BTreeMap::new(),
            incompatibles: Vec::new(),
            loader_conflicts: Vec::new(),
        }
    }

    fn resolve_node(
        &mut self,
        info: &ModInfo,
        kind: DependencyType,
        depth: usize,
    ) -> Result<ResolvedDependency, ResolutionError> {
        let key = info.key();
        if self.visiting.contains(&key) {
            let mut chain = self.path.clone();
            chain.push(key.clone());
            return Err(ResolutionError::circular(&key).with_details(chain.join(" -> ")));
        }

        if let Some(mut cached) = self.cache.get(&key) {
            tracing::debug!("cache hit for {key}");
            for node in cached.pre_order() {
                self.visited.insert(node.id.clone());
            }
            cached.kind = kind;
            cached.is_optional = kind == DependencyType::Optional;
            return Ok(cached);
        }

        let max_depth = self.resolver.options.max_depth;
        if max_depth > 0 && depth >= max_depth {
            tracing::debug!("depth limit {max_depth} reached at {key}");
            self.visited.insert(info.id.clone());
            return Ok(ResolvedDependency::from_mod(info, kind));
        }

        self.visiting.insert(key.clone());
        self.path.push(key.clone());
        let result = self.expand(info, kind, depth);
        self.path.pop();
        self.visiting.remove(&key);

        let node = result?;
        self.visited.insert(info.id.clone());
        self.cache.insert(key, node.clone());
        Ok(node)
    }

    fn expand(
        &mut self,
        info: &ModInfo,
        kind: DependencyType,
        depth: usize,
    ) -> Result<ResolvedDependency, ResolutionError> {
        self.check_loader(info);

        let mut node = ResolvedDependency::from_mod(info, kind);
        for dep in &info.dependencies {
            match dep.kind {
                DependencyType::Incompatible => {
                    if self.visited.contains(&dep.id) {
                        tracing::warn!("{} is incompatible with {}", info.id, dep.id);
                        self.incompatibles.push(IncompatiblePair {
                            mod_a: info.id.clone(),
                            mod_b: dep.id.clone(),
                            reason: format!("{} declares {} incompatible", info.id, dep.id),
                        });
                    }
                }
                DependencyType::Optional if !self.resolver.options.include_optional => {
                    tracing::debug!("skipping optional {} of {}", dep.id, info.key());
                }
                DependencyType::Embedded => {
                    self.visited.insert(dep.id.clone());
                    node.dependencies
                        .push(ResolvedDependency::embedded(&dep.id, &dep.version_constraint));
                }
                DependencyType::Required | DependencyType::Optional => {
                    match self.resolve_dependency(info, dep, depth) {
                        Ok(child) => node.dependencies.push(child),
                        Err(err) if dep.kind == DependencyType::Optional => {
                            tracing::warn!(
                                "optional dependency {} of {} skipped: {err}",
                                dep.id,
                                info.key()
                            );
                        }
                        Err(err) => return Err(err),
                    }
                }
            }
        }
        Ok(node)
    }

    fn resolve_dependency(
        &mut self,
        parent: &ModInfo,
        dep: &Dependency,
        depth: usize,
    ) -> Result<ResolvedDependency, ResolutionError> {
        let selected = self
            .resolver
            .find_best_version(&dep.id, &dep.version_constraint)?;
        tracing::debug!(
            "{} requires {} {}: selected {}",
            parent.id,
            dep.id,
            if dep.is_unconstrained() { "*" } else { dep.version_constraint.as_str() },
            selected.version
        );

        let child = self.resolve_node(&selected, dep.kind, depth + 1)?;
        self.requests.entry(dep.id.clone()).or_default().push(Request {
            requester: parent.id.clone(),
            constraint: dep.version_constraint.clone(),
            version: selected.version,
        });
        Ok(child)
    }

    /// Compare the mod's loader requirements with the configured target.
    /// Mods that declare no requirements are taken as loader-agnostic.
    fn check_loader(&mut self, info: &ModInfo) {
        let options = &self.resolver.options;
        let Some(target) = options.target_loader else {
            return;
        };
        if info.loader_requirements.is_empty() {
            return;
        }
        let target_version = options.target_loader_version.trim();

        let declared: Vec<_> = info
            .loader_requirements
            .iter()
            .filter(|r| r.loader == target)
            .collect();
        if declared.is_empty() {
            tracing::warn!("{} does not declare support for {target}", info.key());
            self.loader_conflicts.push(LoaderConflict {
                mod_id: info.id.clone(),
                required_loader: None,
                required_version: String::new(),
                target_loader: target,
                target_version: target_version.to_string(),
                reason: format!("{} does not declare support for {target}", info.id),
            });
            return;
        }

        let Ok(version) = parse_version(target_version) else {
            tracing::debug!("no usable {target} version to check {} against", info.key());
            return;
        };
        for req in declared {
            let satisfied = parse_version_constraints(&req.version_constraint)
                .is_ok_and(|c| c.matches_all(&version));
            if !satisfied {
                tracing::warn!(
                    "{} requires {target} {}, target is {target_version}",
                    info.key(),
                    req.version_constraint
                );
                self.loader_conflicts.push(LoaderConflict {
                    mod_id: info.id.clone(),
                    required_loader: Some(req.loader),
                    required_version: req.version_constraint.clone(),
                    target_loader: target,
                    target_version: target_version.to_string(),
                    reason: format!(
                        "{target} {target_version} does not satisfy {}",
                        req.version_constraint
                    ),
                });
            }
        }
    }

    /// Ids that ended up in the tree at more than one version.
    fn version_conflicts(&self, all_mods: &[ResolvedDependency]) -> Vec<VersionConflict> {
        let present: HashSet<String> = all_mods.iter().map(ResolvedDependency::key).collect();
        self.requests
            .iter()
            .filter_map(|(id, requests)| {
                let requests: Vec<&Request> = requests
                    .iter()
                    .filter(|r| present.contains(&format!("{id}@{}", r.version)))
                    .collect();
                let versions: HashSet<&str> = requests.iter().map(|r| r.version.as_str()).collect();
                (versions.len() > 1).then(|| VersionConflict {
                    mod_id: id.clone(),
                    required_by: requests.iter().map(|r| r.requester.clone()).collect(),
                    constraints: requests.iter().map(|r| r.constraint.clone()).collect(),
                })
            })
            .collect()
    }
}
