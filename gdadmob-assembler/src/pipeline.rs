//! The plugin build as a graph of named tasks.
//!
//! Generation writes into the output directory, the build tasks assemble
//! the plugin directory from it, and the archive tasks zip the plugin
//! directory into `release/`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use gdadmob_mediation::ExpandOutcome;
use gdadmob_package::{Archive, ArchiveBuilder};
use gdadmob_props::{Platform, PluginConfig, PropertySet, VersionCatalog};
use gdadmob_template::{find_unresolved, FileSet, Generator, TokenMap};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::copy::{remove_tree, CleanSpec, CopySpec, PathRemap};
use crate::error::{AssemblerError, AssemblerResult};
use crate::graph::{TaskGraph, TaskSpec};

/// Generated script that receives mediation network tokens.
pub const MEDIATION_TARGET: &str = "model/MediationNetwork.gd";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    CleanOutput,
    GenerateGdScript,
    CopyAssets,
    ReplaceMediationTokens,
    GenerateIosConfig,
    BuildDebug,
    BuildRelease,
    CopyIosFrameworks,
    BuildIos,
    Build,
    ValidateOutput,
    CleanDemoAddons,
    InstallToDemo,
    CleanPlugin,
    Clean,
    CreateAndroidArchive,
    CreateIosArchive,
    CreateMultiArchive,
    Archive,
}

impl TaskId {
    pub const ALL: [TaskId; 19] = [
        TaskId::CleanOutput,
        TaskId::GenerateGdScript,
        TaskId::CopyAssets,
        TaskId::ReplaceMediationTokens,
        TaskId::GenerateIosConfig,
        TaskId::BuildDebug,
        TaskId::BuildRelease,
        TaskId::CopyIosFrameworks,
        TaskId::BuildIos,
        TaskId::Build,
        TaskId::ValidateOutput,
        TaskId::CleanDemoAddons,
        TaskId::InstallToDemo,
        TaskId::CleanPlugin,
        TaskId::Clean,
        TaskId::CreateAndroidArchive,
        TaskId::CreateIosArchive,
        TaskId::CreateMultiArchive,
        TaskId::Archive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskId::CleanOutput => "cleanOutput",
            TaskId::GenerateGdScript => "generateGDScript",
            TaskId::CopyAssets => "copyAssets",
            TaskId::ReplaceMediationTokens => "replaceMediationTokens",
            TaskId::GenerateIosConfig => "generateiOSConfig",
            TaskId::BuildDebug => "buildDebug",
            TaskId::BuildRelease => "buildRelease",
            TaskId::CopyIosFrameworks => "copyiOSFrameworks",
            TaskId::BuildIos => "buildiOS",
            TaskId::Build => "build",
            TaskId::ValidateOutput => "validateOutput",
            TaskId::CleanDemoAddons => "cleanDemoAddons",
            TaskId::InstallToDemo => "installToDemo",
            TaskId::CleanPlugin => "cleanPlugin",
            TaskId::Clean => "clean",
            TaskId::CreateAndroidArchive => "createAndroidArchive",
            TaskId::CreateIosArchive => "createiOSArchive",
            TaskId::CreateMultiArchive => "createMultiArchive",
            TaskId::Archive => "archive",
        }
    }

    /// Relationships to other tasks.
    fn spec(self) -> TaskSpec {
        use TaskId as T;
        let deps = |tasks: &[TaskId]| {
            tasks
                .iter()
                .fold(TaskSpec::new(), |spec, t| spec.depends_on(t.as_str()))
        };
        match self {
            T::CleanOutput | T::CleanDemoAddons | T::CleanPlugin => TaskSpec::new(),
            T::GenerateGdScript => deps(&[T::CleanOutput])
                .finalized_by(T::CopyAssets.as_str())
                .finalized_by(T::ReplaceMediationTokens.as_str()),
            T::CopyAssets => TaskSpec::new().must_run_after(T::CleanOutput.as_str()),
            T::ReplaceMediationTokens => deps(&[T::GenerateGdScript]),
            T::GenerateIosConfig => TaskSpec::new().must_run_after(T::GenerateGdScript.as_str()),
            T::BuildDebug | T::BuildRelease => deps(&[T::ReplaceMediationTokens, T::CopyAssets])
                .must_run_after(T::CleanPlugin.as_str()),
            T::CopyIosFrameworks => TaskSpec::new().must_run_after(T::CleanPlugin.as_str()),
            T::BuildIos => deps(&[
                T::ReplaceMediationTokens,
                T::CopyAssets,
                T::GenerateIosConfig,
                T::CopyIosFrameworks,
            ])
            .must_run_after(T::CleanPlugin.as_str()),
            T::Build => deps(&[T::BuildDebug, T::BuildRelease, T::BuildIos]),
            T::ValidateOutput => TaskSpec::new()
                .must_run_after(T::BuildDebug.as_str())
                .must_run_after(T::BuildRelease.as_str())
                .must_run_after(T::BuildIos.as_str()),
            T::InstallToDemo => {
                deps(&[T::BuildDebug]).must_run_after(T::CleanDemoAddons.as_str())
            }
            T::Clean => deps(&[T::CleanDemoAddons, T::CleanOutput, T::CleanPlugin]),
            T::CreateAndroidArchive => {
                deps(&[T::BuildDebug, T::BuildRelease, T::ValidateOutput])
            }
            T::CreateIosArchive => deps(&[T::BuildIos, T::ValidateOutput]),
            T::CreateMultiArchive => deps(&[T::CreateAndroidArchive, T::CreateIosArchive]),
            T::Archive => deps(&[
                T::CreateAndroidArchive,
                T::CreateIosArchive,
                T::CreateMultiArchive,
            ]),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskId {
    type Err = AssemblerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AssemblerError::UnknownTask(s.to_string()))
    }
}

/// What a task did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Done(String),
    /// An optional input was missing.
    Skipped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tasks: Vec<(TaskId, TaskOutcome)>,
}

impl RunReport {
    pub fn outcome(&self, task: TaskId) -> Option<&TaskOutcome> {
        self.tasks.iter().find(|(t, _)| *t == task).map(|(_, o)| o)
    }

    pub fn skipped(&self) -> usize {
        self.tasks
            .iter()
            .filter(|(_, o)| matches!(o, TaskOutcome::Skipped(_)))
            .count()
    }
}

/// Resolved directories of one plugin build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub template_dir: PathBuf,
    pub ios_config_dir: PathBuf,
    /// `<output>/addons/<pluginName>`
    pub output_addon: PathBuf,
    /// `<output>/ios/plugins`
    pub output_ios: PathBuf,
    pub android_aar_dir: PathBuf,
    pub ios_framework_dir: PathBuf,
    /// `<plugin>/addons/<pluginName>`
    pub plugin_addon: PathBuf,
    /// `<plugin>/ios`
    pub plugin_ios: PathBuf,
    pub plugin_dir: PathBuf,
    pub archive_dir: PathBuf,
    /// `<demo>/addons/<pluginName>`
    pub demo_addon: PathBuf,
    pub mediation_properties: PathBuf,
    pub version_catalog: PathBuf,
}

impl Layout {
    pub fn new(config: &PipelineConfig, plugin_name: &str) -> Self {
        let output = config.resolve(&config.output_dir);
        let plugin_dir = config.resolve(&config.plugin_dir);
        Self {
            template_dir: config.resolve(&config.template_dir),
            ios_config_dir: config.resolve(&config.ios_config_dir),
            output_addon: output.join("addons").join(plugin_name),
            output_ios: output.join("ios").join("plugins"),
            android_aar_dir: config.resolve(&config.android_aar_dir),
            ios_framework_dir: config.resolve(&config.ios_framework_dir),
            plugin_addon: plugin_dir.join("addons").join(plugin_name),
            plugin_ios: plugin_dir.join("ios"),
            archive_dir: config.resolve(&config.archive_dir),
            demo_addon: config.resolve(&config.demo_dir).join("addons").join(plugin_name),
            mediation_properties: config.resolve(&config.mediation_properties),
            version_catalog: config.resolve(&config.version_catalog),
            plugin_dir,
        }
    }
}

/// A configured plugin build.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    plugin: PluginConfig,
    layout: Layout,
    graph: TaskGraph,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, plugin: PluginConfig) -> Self {
        let layout = Layout::new(&config, &plugin.name);
        let mut graph = TaskGraph::new();
        for task in TaskId::ALL {
            graph.register(task.as_str(), task.spec());
        }
        Self {
            config,
            plugin,
            layout,
            graph,
        }
    }

    /// Reads the plugin property files named by `config`.
    pub fn load(config: PipelineConfig) -> AssemblerResult<Self> {
        let plugin = PluginConfig::load(
            &config.resolve(&config.common_properties),
            &config.resolve(&config.ios_properties),
        )?;
        info!(plugin = %plugin.name, version = %plugin.version, "Loaded plugin config");
        Ok(Self::new(config, plugin))
    }

    pub fn plugin(&self) -> &PluginConfig {
        &self.plugin
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    /// Execution order for `targets`.
    pub fn plan(&self, targets: &[TaskId]) -> AssemblerResult<Vec<TaskId>> {
        let names: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();
        self.graph
            .plan(&names)?
            .iter()
            .map(|name| name.parse())
            .collect()
    }

    /// Plans and runs `targets`, stopping at the first failing task.
    pub fn run(&self, targets: &[TaskId]) -> AssemblerResult<RunReport> {
        let mut report = RunReport::default();
        for task in self.plan(targets)? {
            let outcome = self.run_task(task)?;
            match &outcome {
                TaskOutcome::Done(detail) => info!(task = %task, "{detail}"),
                TaskOutcome::Skipped(reason) => warn!(task = %task, "Skipped: {reason}"),
            }
            report.tasks.push((task, outcome));
        }
        Ok(report)
    }

    /// Runs one task without its dependencies.
    pub fn run_task(&self, task: TaskId) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        match task {
            TaskId::CleanOutput => {
                let removed = CleanSpec::new(
                    FileSet::new(&l.output_addon)
                        .include("**/*.gd")?
                        .include("**/*.cfg")?
                        .include("**/*.png")?,
                )
                .run()?
                    + CleanSpec::new(FileSet::new(&l.output_ios).include("**/*.gdip")?).run()?;
                Ok(TaskOutcome::Done(format!("removed {removed} generated file(s)")))
            }
            TaskId::GenerateGdScript => self.generate_scripts(),
            TaskId::CopyAssets => {
                let copied = CopySpec::new(
                    FileSet::new(&l.template_dir).include("**/*.png")?,
                    &l.output_addon,
                )
                .copy()?;
                Ok(TaskOutcome::Done(format!("copied {} asset(s)", copied.len())))
            }
            TaskId::ReplaceMediationTokens => self.replace_mediation_tokens(),
            TaskId::GenerateIosConfig => self.generate_ios_config(),
            TaskId::BuildDebug => self.build_variant("debug"),
            TaskId::BuildRelease => self.build_variant("release"),
            TaskId::CopyIosFrameworks => self.copy_ios_frameworks(),
            TaskId::BuildIos => {
                let scripts = CopySpec::new(FileSet::new(&l.output_addon), &l.plugin_addon).copy()?;
                let configs = if l.output_ios.is_dir() {
                    CopySpec::new(FileSet::new(&l.output_ios), l.plugin_ios.join("plugins")).copy()?
                } else {
                    Vec::new()
                };
                Ok(TaskOutcome::Done(format!(
                    "assembled {} script(s) and {} iOS config(s)",
                    scripts.len(),
                    configs.len()
                )))
            }
            TaskId::Build | TaskId::Clean | TaskId::Archive => {
                Ok(TaskOutcome::Done("dependencies complete".into()))
            }
            TaskId::ValidateOutput => self.validate_output(),
            TaskId::CleanDemoAddons => {
                let removed = CleanSpec::new(
                    FileSet::new(&l.demo_addon)
                        .exclude("**/*.uid")?
                        .exclude("**/*.import")?,
                )
                .run()?;
                Ok(TaskOutcome::Done(format!("removed {removed} demo file(s)")))
            }
            TaskId::InstallToDemo => {
                let copied = CopySpec::new(FileSet::new(&l.plugin_addon), &l.demo_addon).copy()?;
                Ok(TaskOutcome::Done(format!(
                    "installed {} file(s) into {}",
                    copied.len(),
                    l.demo_addon.display()
                )))
            }
            TaskId::CleanPlugin => {
                if remove_tree(&l.plugin_dir)? {
                    Ok(TaskOutcome::Done(format!("removed {}", l.plugin_dir.display())))
                } else {
                    Ok(TaskOutcome::Done("nothing to remove".into()))
                }
            }
            TaskId::CreateAndroidArchive => self.create_archive(Platform::Android),
            TaskId::CreateIosArchive => self.create_archive(Platform::Ios),
            TaskId::CreateMultiArchive => self.create_archive(Platform::Multi),
        }
    }

    fn android_dependencies(&self) -> AssemblerResult<Vec<String>> {
        let path = &self.layout.version_catalog;
        if !path.is_file() {
            warn!(path = %path.display(), "Version catalog not found, no Android dependencies");
            return Ok(Vec::new());
        }
        Ok(VersionCatalog::load(path)?.dependencies())
    }

    fn generate_scripts(&self) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        if !l.template_dir.is_dir() {
            return Err(AssemblerError::MissingInput(l.template_dir.clone()));
        }
        let dependencies = self.android_dependencies()?;
        let generator = Generator::new()
            .pass(
                "explicit",
                self.plugin.script_tokens(&dependencies).into_iter().collect(),
            )
            .pass("sweep", TokenMap::sweep(&self.plugin.build_properties()));
        let templates = FileSet::new(&l.template_dir)
            .include("**/*.gd")?
            .include("**/*.cfg")?;
        let generated = generator.generate(&templates, &l.output_addon)?;
        let replacements: usize = generated.iter().map(|f| f.replacements).sum();
        Ok(TaskOutcome::Done(format!(
            "generated {} file(s), {replacements} replacement(s)",
            generated.len()
        )))
    }

    fn replace_mediation_tokens(&self) -> AssemblerResult<TaskOutcome> {
        let path = &self.layout.mediation_properties;
        if !path.is_file() {
            return Ok(TaskOutcome::Skipped(format!(
                "mediation properties not found at {}",
                path.display()
            )));
        }
        let props = PropertySet::load(path)?;
        let target = self.layout.output_addon.join(MEDIATION_TARGET);
        match gdadmob_mediation::expand_file(&target, &props)? {
            ExpandOutcome::Expanded {
                networks,
                replacements,
            } => Ok(TaskOutcome::Done(format!(
                "expanded {networks} network(s), {replacements} replacement(s)"
            ))),
            ExpandOutcome::Skipped => Ok(TaskOutcome::Skipped(format!(
                "{} not generated",
                target.display()
            ))),
        }
    }

    fn generate_ios_config(&self) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        if !l.ios_config_dir.is_dir() {
            return Err(AssemblerError::MissingInput(l.ios_config_dir.clone()));
        }
        let generator =
            Generator::new().pass("ios", self.plugin.ios_config_tokens().into_iter().collect());
        let configs = FileSet::new(&l.ios_config_dir).include("**/*.gdip")?;
        let generated = generator.generate(&configs, &l.output_ios)?;
        Ok(TaskOutcome::Done(format!("generated {} iOS config(s)", generated.len())))
    }

    fn build_variant(&self, variant: &str) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        let scripts = CopySpec::new(FileSet::new(&l.output_addon), &l.plugin_addon).copy()?;

        let aar = self.plugin.aar_name(variant);
        let source = l.android_aar_dir.join(&aar);
        if !source.is_file() {
            return Ok(TaskOutcome::Skipped(format!(
                "{} not found, assembled {} script(s) only",
                source.display(),
                scripts.len()
            )));
        }
        let dest = l.plugin_addon.join("bin").join(variant);
        CopySpec::new(FileSet::new(&l.android_aar_dir).include(&aar)?, &dest).copy()?;
        Ok(TaskOutcome::Done(format!(
            "assembled {} script(s) and {aar}",
            scripts.len()
        )))
    }

    fn copy_ios_frameworks(&self) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        if !l.ios_framework_dir.is_dir() {
            return Ok(TaskOutcome::Skipped(format!(
                "framework directory {} not found",
                l.ios_framework_dir.display()
            )));
        }
        let copied = CopySpec::new(
            FileSet::new(&l.ios_framework_dir),
            l.plugin_ios.join("framework"),
        )
        .remap(PathRemap::FromSuffix(".xcframework".into()))
        .copy()?;
        Ok(TaskOutcome::Done(format!("copied {} framework file(s)", copied.len())))
    }

    fn validate_output(&self) -> AssemblerResult<TaskOutcome> {
        let root = &self.layout.plugin_dir;
        if !root.is_dir() {
            return Ok(TaskOutcome::Skipped(format!("{} not assembled", root.display())));
        }
        let files = FileSet::new(root)
            .include("**/*.gd")?
            .include("**/*.cfg")?
            .include("**/*.gdip")?;

        let mut count = 0;
        let mut first: Option<(String, PathBuf)> = None;
        for entry in files.files()? {
            let text = std::fs::read_to_string(&entry.path)
                .map_err(|e| AssemblerError::io(&entry.path, e))?;
            for token in find_unresolved(&text) {
                warn!(
                    file = %entry.relative.display(),
                    line = token.line,
                    token = %token.name,
                    "Unresolved token"
                );
                count += 1;
                first.get_or_insert_with(|| (token.name.clone(), entry.relative.clone()));
            }
        }

        match first {
            Some((first, file)) if self.config.strict_tokens => {
                Err(AssemblerError::Unresolved { count, first, file })
            }
            Some(_) => Ok(TaskOutcome::Done(format!("{count} unresolved token(s)"))),
            None => Ok(TaskOutcome::Done("no unresolved tokens".into())),
        }
    }

    fn create_archive(&self, platform: Platform) -> AssemblerResult<TaskOutcome> {
        let l = &self.layout;
        let addon_prefix = format!("addons/{}", self.plugin.name);
        let mut builder = ArchiveBuilder::new();

        match platform {
            Platform::Android => {
                require_dir(&l.plugin_addon)?;
                builder.add_tree(&FileSet::new(&l.plugin_addon), &addon_prefix)?;
            }
            Platform::Ios => {
                require_dir(&l.plugin_addon)?;
                builder.add_tree(
                    &FileSet::new(&l.plugin_addon).exclude("**/*.aar")?,
                    &addon_prefix,
                )?;
                if l.plugin_ios.is_dir() {
                    builder.add_tree(&FileSet::new(&l.plugin_ios), "ios")?;
                }
            }
            Platform::Multi => {
                for source in [Platform::Android, Platform::Ios] {
                    let path = self.archive_path(source);
                    if !path.is_file() {
                        return Err(AssemblerError::MissingInput(path));
                    }
                    for entry in Archive::open_path(&path)?.entries() {
                        builder.add_file(entry.name.clone(), entry.data.clone());
                    }
                }
            }
        }

        let path = self.archive_path(platform);
        let bytes = builder.write_to(&path)?;
        Ok(TaskOutcome::Done(format!(
            "wrote {} ({} entries, {bytes} bytes, {} duplicate(s) excluded)",
            path.display(),
            builder.len(),
            builder.duplicates()
        )))
    }

    pub fn archive_path(&self, platform: Platform) -> PathBuf {
        self.layout.archive_dir.join(self.plugin.archive_name(platform))
    }
}

fn require_dir(path: &Path) -> AssemblerResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(AssemblerError::MissingInput(path.to_path_buf()))
    }
}
