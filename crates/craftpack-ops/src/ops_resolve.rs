//! Operation: resolve one mod, or every required mod of the pack.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use craftpack_core::config::Strategy;
use craftpack_core::dependency::{Dependency, DependencyType, LoaderType};
use craftpack_resolver::{DependencyGraph, MetadataProvider, ResolutionOptions, Resolver};
use craftpack_util::errors::CraftpackError;
use craftpack_util::progress;

use crate::{Context, MANIFEST_FILE};

/// Options for `craftpack resolve`. `None` fields keep the configured value.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Mod to resolve; `None` resolves the pack's required dependencies.
    pub root: Option<String>,
    pub version: Option<String>,
    pub index: Option<PathBuf>,
    pub strategy: Option<Strategy>,
    pub no_optional: bool,
    pub max_depth: Option<usize>,
    pub loader: Option<LoaderType>,
    pub loader_version: Option<String>,
    pub minecraft: Option<String>,
    pub json: bool,
}

impl ResolveOptions {
    /// Apply command-line overrides on top of config and manifest defaults.
    pub fn apply(&self, options: &mut ResolutionOptions) {
        if let Some(strategy) = self.strategy {
            options.strategy = strategy;
        }
        if self.no_optional {
            options.include_optional = false;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        if let Some(loader) = self.loader {
            options.target_loader = Some(loader);
        }
        if let Some(version) = &self.loader_version {
            options.target_loader_version = version.clone();
        }
        if let Some(minecraft) = &self.minecraft {
            options.minecraft_version = Some(minecraft.clone());
        }
    }
}

/// Resolve and print the result.
pub async fn resolve(project_dir: &Path, opts: &ResolveOptions) -> miette::Result<()> {
    let ctx = Context::load(project_dir, opts.index.as_deref())?;
    let mut options = ctx.resolution_options();
    opts.apply(&mut options);
    let jobs = ctx.config.resolver.jobs;
    let manifest = ctx.manifest;
    let resolver = Arc::new(Resolver::new(ctx.provider, options));

    let graphs = match &opts.root {
        Some(root) => {
            let version = opts.version.as_deref().unwrap_or("*");
            progress::status("Resolving", &format!("{root}@{version}"));
            vec![resolver.resolve(root, version)?]
        }
        None => {
            let manifest = manifest.ok_or_else(|| CraftpackError::Manifest {
                message: format!(
                    "no {MANIFEST_FILE} in {}; pass a mod id to resolve",
                    project_dir.display()
                ),
            })?;
            let roots = required_roots(manifest.dependencies());
            progress::status(
                "Resolving",
                &format!(
                    "{} v{} ({} mods)",
                    manifest.package.name,
                    manifest.package.version,
                    roots.len()
                ),
            );
            resolve_all(resolver, roots, jobs).await?
        }
    };

    if opts.json {
        let json = match graphs.as_slice() {
            [single] if opts.root.is_some() => single.to_json(),
            _ => serde_json::to_string_pretty(&graphs),
        }
        .map_err(|e| CraftpackError::Generic {
            message: format!("Failed to serialize resolution: {e}"),
        })?;
        println!("{json}");
        return Ok(());
    }

    for graph in &graphs {
        print_graph(graph);
    }
    Ok(())
}

/// One root per required mod id. Several constraints declared for the same id
/// are joined so the selected version satisfies all of them.
fn required_roots(deps: Vec<Dependency>) -> Vec<Dependency> {
    let mut roots: Vec<Dependency> = Vec::new();
    for dep in deps.into_iter().filter(|d| d.kind == DependencyType::Required) {
        match roots.iter_mut().find(|r| r.id == dep.id) {
            None => roots.push(dep),
            Some(_) if dep.is_unconstrained() => {}
            Some(root) if root.is_unconstrained() => {
                root.version_constraint = dep.version_constraint;
            }
            Some(root) => {
                root.version_constraint =
                    format!("{} {}", root.version_constraint, dep.version_constraint);
            }
        }
    }
    roots
}

/// Resolve several roots concurrently on one shared resolver.
///
/// Each root's constraint picks the root version; at most `jobs` resolutions
/// run at once. Graphs come back in the order of `roots`. The first failure
/// aborts the batch.
pub async fn resolve_all<P>(
    resolver: Arc<Resolver<P>>,
    roots: Vec<Dependency>,
    jobs: u32,
) -> miette::Result<Vec<DependencyGraph>>
where
    P: MetadataProvider + 'static,
{
    tracing::info!("resolving {} roots with up to {jobs} jobs", roots.len());
    let sp = progress::spinner(&format!("Resolving {} mods...", roots.len()));
    let semaphore = Arc::new(Semaphore::new(jobs.max(1) as usize));
    let mut join_set = JoinSet::new();

    for (index, root) in roots.into_iter().enumerate() {
        let resolver = Arc::clone(&resolver);
        let sem = semaphore.clone();
        join_set.spawn(async move {
            let _permit = sem
                .acquire()
                .await
                .map_err(|e| miette::miette!("Resolution pool closed: {}", e))?;
            let graph = tokio::task::spawn_blocking(move || {
                let selected = resolver.find_best_version(&root.id, &root.version_constraint)?;
                resolver.resolve(&root.id, &selected.version)
            })
            .await
            .map_err(|e| miette::miette!("Background task failed: {}", e))??;
            Ok::<_, miette::Report>((index, graph))
        });
    }

    let mut graphs = Vec::new();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Ok(entry)) => graphs.push(entry),
            Ok(Err(e)) => {
                sp.finish_and_clear();
                return Err(e);
            }
            Err(e) => {
                sp.finish_and_clear();
                return Err(miette::miette!("Background task failed: {}", e));
            }
        }
    }
    sp.finish_and_clear();
    tracing::info!("resolved {} roots", graphs.len());

    graphs.sort_by_key(|(index, _)| *index);
    Ok(graphs.into_iter().map(|(_, graph)| graph).collect())
}

fn print_graph(graph: &DependencyGraph) {
    progress::status(
        "Resolved",
        &format!("{} ({} mods)", graph.root, graph.all_mods.len()),
    );
    for entry in graph.all_mods.iter().skip(1) {
        let marker = match entry.kind {
            DependencyType::Optional => " (optional)",
            DependencyType::Embedded => " (embedded)",
            _ => "",
        };
        println!("  {entry}{marker}");
    }
    for problem in graph.errors() {
        progress::status_warn("Warning", &problem);
    }
}
