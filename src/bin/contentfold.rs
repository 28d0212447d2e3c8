use clap::{Parser, Subcommand, ValueEnum};
use contentfold::config::CONFIG_PATH_ENV;
use contentfold::db_operations::{FilesListParams, FilesWhere, SledFilesTable};
use contentfold::logging::LoggingSystem;
use contentfold::schema::{prepare_form_data, FieldValueTransformers, FieldValueValidators, SchemaError};
use contentfold::{
    load_cms_config, CmsConfig, ContentModel, ContentModelValidator, DbOperations, Endpoint,
    FieldTypeRegistry, FilesStorageOperations, SchemaProjector,
};
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML configuration file (defaults to $CONTENTFOLD_CONFIG,
    /// then contentfold.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEndpoint {
    /// Read-only query schema
    Read,
    /// Authoring schema with inputs and mutations
    Manage,
}

impl From<CliEndpoint> for Endpoint {
    fn from(endpoint: CliEndpoint) -> Self {
        match endpoint {
            CliEndpoint::Read => Endpoint::Read,
            CliEndpoint::Manage => Endpoint::Manage,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the GraphQL SDL generated for one or more content models
    Schema {
        /// JSON file holding a content model or an array of models
        #[arg(long, short)]
        model: PathBuf,
        #[arg(long, short, value_enum, default_value = "read")]
        endpoint: CliEndpoint,
    },
    /// Inspect stored files
    Files {
        #[command(subcommand)]
        command: FilesCommand,
    },
    /// Prepare and validate submitted entry values against a model
    Entry {
        /// JSON file holding one content model
        #[arg(long, short)]
        model: PathBuf,
        /// JSON object of submitted values keyed by fieldId
        #[arg(long, short)]
        data: PathBuf,
    },
}

#[derive(Subcommand)]
enum FilesCommand {
    /// List files of a tenant and locale
    List {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        /// Case-insensitive match on file name and tags
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        /// Cursor returned by a previous page
        #[arg(long)]
        after: Option<String>,
        /// Sort specs such as `createdOn_DESC`
        #[arg(long)]
        sort: Vec<String>,
    },
    /// List the distinct tags of a tenant's files
    Tags {
        #[arg(long)]
        tenant: Option<String>,
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelFile {
    Many(Vec<ContentModel>),
    One(ContentModel),
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("contentfold.toml"))
}

fn read_models(path: &Path) -> Result<Vec<ContentModel>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let models = match serde_json::from_str(&content)? {
        ModelFile::Many(models) => models,
        ModelFile::One(model) => vec![model],
    };
    for model in &models {
        ContentModelValidator::validate(model)?;
    }
    Ok(models)
}

fn handle_schema(
    config: &CmsConfig,
    model: &Path,
    endpoint: Endpoint,
) -> Result<(), Box<dyn std::error::Error>> {
    let models = read_models(model)?;
    let projector = SchemaProjector::new(Arc::new(FieldTypeRegistry::with_builtin_field_types()))
        .with_max_nesting_depth(config.max_nesting_depth);
    let sdl = projector.render_validated_schema(&models, endpoint)?;
    println!("{}", sdl);
    Ok(())
}

fn handle_entry(model: &Path, data: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let models = read_models(model)?;
    let [model] = models.as_slice() else {
        return Err(SchemaError::InvalidModel(format!(
            "{} must hold exactly one model",
            model.display()
        ))
        .into());
    };
    let input: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(data)?)?;

    let prepared = prepare_form_data(input, model, &FieldValueTransformers::with_builtin_transformers());
    match FieldValueValidators::with_builtin_validators().validate_values(&prepared, model) {
        Ok(()) => {
            println!("{}", serde_json::to_string_pretty(&prepared)?);
            Ok(())
        }
        Err(errors) => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "errors": errors }))?);
            Err(SchemaError::InvalidData(format!(
                "{} field value(s) failed validation",
                errors.len()
            ))
            .into())
        }
    }
}

fn open_files(config: &CmsConfig) -> Result<FilesStorageOperations, Box<dyn std::error::Error>> {
    info!("Opening store at {}", config.storage_path.display());
    let db = DbOperations::open(&config.storage_path)?;
    Ok(FilesStorageOperations::new(Arc::new(SledFilesTable::new(db))))
}

async fn handle_files(
    config: &CmsConfig,
    command: FilesCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = open_files(config)?;
    let scope = |tenant: Option<String>, locale: Option<String>, search: Option<String>| {
        let mut filter = FilesWhere::new(
            tenant.unwrap_or_else(|| config.default_tenant.clone()),
            locale.unwrap_or_else(|| config.default_locale.clone()),
        );
        filter.search = search;
        filter
    };

    match command {
        FilesCommand::List {
            tenant,
            locale,
            search,
            limit,
            after,
            sort,
        } => {
            let mut params = FilesListParams::new(
                scope(tenant, locale, search),
                limit.unwrap_or(config.default_list_limit),
            )
            .sort(sort);
            params.after = after;

            let (page, meta) = files.list(&params).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "data": page, "meta": meta }))?
            );
        }
        FilesCommand::Tags {
            tenant,
            locale,
            search,
        } => {
            let (tags, meta) = files.tags(&scope(tenant, locale, search)).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "data": tags, "meta": meta }))?
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_cms_config(config_path(&cli))?;
    config.logging.apply_env_overrides();
    if let Err(e) = LoggingSystem::init_with_config(config.logging.clone()) {
        eprintln!("Logging disabled: {}", e);
    }

    match cli.command {
        Commands::Schema { model, endpoint } => handle_schema(&config, &model, endpoint.into())?,
        Commands::Files { command } => handle_files(&config, command).await?,
        Commands::Entry { model, data } => handle_entry(&model, &data)?,
    }
    Ok(())
}
