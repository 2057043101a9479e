//! Screens shared by every entity command
//!
//! Each entity implements [`Screen`] (its columns, detail fields and form
//! lookups); the functions here do the rest: list, show, create, edit,
//! delete and the reactivation modal.

use std::sync::Arc;

use async_trait::async_trait;
use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style};
use tokio::sync::Mutex;

use crate::cli::helpers::{confirm, service_error};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::entity::{Record, Status};
use crate::core::identity::EntityId;
use crate::core::listing::ListController;
use crate::core::reactivation::{
    InactiveModal, ModalBody, ModalView, ReactivateOutcome, ReactivationWorkflow,
};
use crate::core::rest::{ApiClient, RestService};
use crate::core::service::EntityService;
use crate::schema::validator::Validator;
use crate::schema::wizard::{choice_index, Choice, FieldChoices, SchemaWizard};

/// Everything a command needs to reach the backend
pub struct AppContext {
    pub api: ApiClient,
    pub config: Config,
    pub global: GlobalOpts,
}

impl AppContext {
    pub fn new(global: GlobalOpts) -> Result<Self> {
        let config = Config::load().with_api_url(global.api_url.clone());
        let api = ApiClient::from_config(&config)
            .map_err(|e| miette::miette!("Failed to set up HTTP client: {}", e))?;
        tracing::debug!(api_url = api.base_url(), "using backend");
        Ok(Self {
            api,
            config,
            global,
        })
    }

    pub fn service<T: Record>(&self) -> Arc<dyn EntityService<T>> {
        Arc::new(RestService::<T>::new(self.api.clone()))
    }

    /// `--format`, or the configured default when left on auto
    pub fn format(&self) -> OutputFormat {
        if self.global.format != OutputFormat::Auto {
            return self.global.format;
        }
        self.config
            .default_format
            .as_deref()
            .and_then(|f| <OutputFormat as clap::ValueEnum>::from_str(f, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}

/// Per-entity presentation
#[async_trait]
pub trait Screen: Record {
    /// List and modal columns
    const COLUMNS: &'static [ColumnDef];

    fn row(&self) -> TableRow;

    /// Heading of the detail view
    fn heading(&self) -> String;

    /// Labelled fields of the detail view
    fn details(&self) -> Vec<(&'static str, String)>;

    /// Options for the form's reference fields. Fails when the form cannot
    /// be filled because a required list is empty.
    async fn form_choices(_ctx: &AppContext) -> Result<FieldChoices> {
        Ok(FieldChoices::new())
    }
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    /// Filter by search term (case-insensitive substring)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Limit output to N items
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only, not the items
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: EntityId,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Record id
    pub id: EntityId,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct ReactivateArgs {
    /// Reactivate this record without prompting
    #[arg(long)]
    pub id: Option<EntityId>,
}

/// Capitalized plural, e.g. "Students"
fn title_plural<T: Record>() -> String {
    let plural = T::KIND.plural();
    let mut chars = plural.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn list<T: Screen>(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let mut controller = ListController::new(ctx.service::<T>());
    if controller.load().await.is_err() {
        let message = controller.error().unwrap_or("Failed to load records").to_string();
        return Err(miette::miette!("{}", message));
    }

    if let Some(term) = &args.search {
        controller.set_search(term.clone());
    }
    let mut items = controller.filtered();
    if let Some(limit) = args.limit {
        items.truncate(limit);
    }

    if args.count {
        println!("{}", items.len());
        return Ok(());
    }

    let format = match ctx.format() {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&items).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&items).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ if items.is_empty() && format == OutputFormat::Tsv => {
            if controller.search().trim().is_empty() {
                println!("No {} found.", T::KIND.plural());
                println!();
                println!(
                    "Create one with: {}",
                    style(format!("academia {} new", T::KIND.resource())).yellow()
                );
            } else {
                println!("No {} match '{}'.", T::KIND.plural(), controller.search());
            }
        }
        _ => {
            let rows: Vec<TableRow> = items.iter().map(|item| item.row()).collect();
            let mut formatter = TableFormatter::new(T::COLUMNS, T::KIND);
            if ctx.global.quiet {
                formatter = formatter.without_summary();
            }
            formatter.output(&rows, format);
        }
    }

    Ok(())
}

pub async fn show<T: Screen>(ctx: &AppContext, id: EntityId) -> Result<()> {
    let record = ctx
        .service::<T>()
        .get_by_id(id)
        .await
        .map_err(|e| service_error(e, &format!("Failed to load {}", T::KIND.singular())))?;

    match ctx.format() {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&record).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => println!("{}", id),
        _ => print!("{}", render_detail(&record)),
    }

    Ok(())
}

/// Pretty detail block with status badge
pub fn render_detail<T: Screen>(record: &T) -> String {
    let badge = match record.status() {
        Status::Active => style(" Active ").black().on_green(),
        Status::Inactive => style(" Inactive ").white().on_red(),
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", style("─".repeat(60)).dim()));
    out.push_str(&format!(
        "{}  {}\n",
        style(record.heading()).yellow().bold(),
        badge
    ));
    out.push_str(&format!("{}\n", style("─".repeat(60)).dim()));
    if let Some(id) = record.id() {
        out.push_str(&format!("{}: {}\n", style("ID").bold(), style(id).cyan()));
    }
    for (label, value) in record.details() {
        out.push_str(&format!("{}: {}\n", style(label).bold(), value));
    }
    out
}

pub async fn create<T: Screen>(
    ctx: &AppContext,
    flags: Map<String, Value>,
    interactive: bool,
) -> Result<()> {
    let choices = T::form_choices(ctx).await?;
    let no_flags = flags.is_empty();
    let mut form = resolve_choices(flags, &choices)?;

    if interactive || (no_flags && Term::stderr().is_term()) {
        form = object(SchemaWizard::new().run(T::KIND, &Value::Object(form), &choices)?);
    }
    form.entry("ativo").or_insert(Value::Bool(true));

    let record: T = validate_form(Value::Object(form))?;
    let created = ctx
        .service::<T>()
        .create(&record)
        .await
        .map_err(|e| service_error(e, &format!("Failed to save {}", T::KIND.singular())))?;

    match created.id() {
        Some(id) => println!(
            "{} Created {} {}",
            style("✓").green(),
            T::KIND.singular(),
            style(id).cyan()
        ),
        None => println!("{} Created {}", style("✓").green(), T::KIND.singular()),
    }
    if !ctx.global.quiet {
        println!("   {}", style(created.label()).dim());
    }
    Ok(())
}

pub async fn edit<T: Screen>(
    ctx: &AppContext,
    id: EntityId,
    flags: Map<String, Value>,
    interactive: bool,
) -> Result<()> {
    let no_flags = flags.is_empty();
    if no_flags && !interactive && !Term::stderr().is_term() {
        return Err(miette::miette!(
            help = format!(
                "Pass the fields to change as flags, see: academia {} edit --help",
                T::KIND.resource()
            ),
            "No changes given for {} {}",
            T::KIND.singular(),
            id
        ));
    }

    let service = ctx.service::<T>();
    let existing = service
        .get_by_id(id)
        .await
        .map_err(|e| service_error(e, &format!("Failed to load {}", T::KIND.singular())))?;

    let choices = T::form_choices(ctx).await?;
    let overrides = resolve_choices(flags, &choices)?;

    let mut form = object(serde_json::to_value(&existing).into_diagnostic()?);
    form.extend(overrides);

    if interactive || no_flags {
        form = object(SchemaWizard::new().run(T::KIND, &Value::Object(form), &choices)?);
    }

    let record: T = validate_form(Value::Object(form))?;
    service
        .update(id, &record)
        .await
        .map_err(|e| service_error(e, &format!("Failed to save {}", T::KIND.singular())))?;

    println!(
        "{} Updated {} {}",
        style("✓").green(),
        T::KIND.singular(),
        style(id).cyan()
    );
    Ok(())
}

pub async fn delete<T: Screen>(ctx: &AppContext, args: &DeleteArgs) -> Result<()> {
    let mut controller = ListController::new(ctx.service::<T>());
    let record = controller
        .service()
        .get_by_id(args.id)
        .await
        .map_err(|e| service_error(e, &format!("Failed to load {}", T::KIND.singular())))?;

    let prompt = format!(
        "Deactivate {} {} ({})?",
        T::KIND.singular(),
        args.id,
        record.label()
    );
    if !confirm(&prompt, args.yes)? {
        return Ok(());
    }

    if controller.delete(args.id).await.is_err() {
        let message = controller.error().unwrap_or("Failed to delete record").to_string();
        return Err(miette::miette!("{}", message));
    }

    println!(
        "{} Deactivated {} {}",
        style("✓").green(),
        T::KIND.singular(),
        style(args.id).cyan()
    );
    println!(
        "   Restore with: {}",
        style(format!("academia {} reactivate --id {}", T::KIND.resource(), args.id)).yellow()
    );
    Ok(())
}

/// Modal configuration for an entity list
pub fn modal<T: Screen>() -> InactiveModal<T> {
    let columns: Vec<&str> = T::COLUMNS.iter().map(|c| c.header).collect();
    InactiveModal::new(
        format!("Inactive {}", title_plural::<T>()),
        &columns,
        |record: &T| record.row().texts(T::COLUMNS),
    )
}

/// The reactivation modal of an entity list. Reactivating a row goes
/// through the returned list, which reloads its active records.
fn workflow<T: Screen>(
    ctx: &AppContext,
) -> (ReactivationWorkflow<T>, Arc<Mutex<ListController<T>>>) {
    let list = Arc::new(Mutex::new(ListController::new(ctx.service::<T>())));
    let workflow = ReactivationWorkflow::new(modal::<T>(), list.clone())
        .with_on_close(|| tracing::debug!(kind = %T::KIND, "reactivation closed"));
    (workflow, list)
}

/// Print the inactive records once
pub async fn inactive<T: Screen>(ctx: &AppContext) -> Result<()> {
    let (workflow, _) = workflow::<T>(ctx);
    workflow.open().await;
    let view = workflow.view();
    let state = workflow.state();
    workflow.close();

    match ctx.format() {
        OutputFormat::Json | OutputFormat::Yaml => {
            let crate::core::reactivation::ModalState::Loaded(items) = state else {
                return Err(modal_error(&view));
            };
            if ctx.format() == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&items).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&items).into_diagnostic()?);
            }
            Ok(())
        }
        _ => {
            print!("{}", render_modal(&view));
            match view {
                ModalView::Shown {
                    body: ModalBody::Error(_),
                    ..
                } => Err(modal_error(&view)),
                _ => Ok(()),
            }
        }
    }
}

/// Run the reactivation modal: pick rows to reactivate until closed
pub async fn reactivate<T: Screen>(ctx: &AppContext, args: &ReactivateArgs) -> Result<()> {
    let (workflow, list) = workflow::<T>(ctx);
    workflow.open().await;

    if let Some(id) = args.id {
        let outcome = workflow.reactivate(id).await;
        report_outcome::<T>(&outcome, id);
        print!("{}", render_modal(&workflow.view()));
        workflow.close();
        if outcome == ReactivateOutcome::Reactivated {
            report_list(&*list.lock().await);
        }
        return match outcome {
            ReactivateOutcome::Failed(message) => Err(miette::miette!("{}", message)),
            _ => Ok(()),
        };
    }

    if !Term::stderr().is_term() {
        let view = workflow.view();
        print!("{}", render_modal(&view));
        workflow.close();
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    loop {
        let view = workflow.view();
        print!("{}", render_modal(&view));

        let ModalView::Shown {
            body: ModalBody::Table(table),
            ..
        } = &view
        else {
            break;
        };

        let actionable: Vec<(EntityId, String)> = table
            .rows
            .iter()
            .filter_map(|row| {
                let id = row.id?;
                let label = row.action?;
                Some((id, format!("{} #{}  {}", label, id, row.cells.join(" · "))))
            })
            .collect();

        let mut items: Vec<&str> = actionable.iter().map(|(_, l)| l.as_str()).collect();
        items.push("Close");

        let selection = Select::with_theme(&theme)
            .with_prompt("Select a record")
            .items(&items)
            .default(items.len() - 1)
            .interact()
            .into_diagnostic()?;

        let Some((id, _)) = actionable.get(selection) else {
            break;
        };
        let outcome = workflow.reactivate(*id).await;
        report_outcome::<T>(&outcome, *id);
        if outcome == ReactivateOutcome::Reactivated {
            report_list(&*list.lock().await);
        }
    }

    workflow.close();
    Ok(())
}

/// One line about the reloaded active list
fn report_list<T: Screen>(list: &ListController<T>) {
    match list.error() {
        Some(message) => eprintln!("{} {}", style("✗").red(), message),
        None => println!("   {} active {}", list.items().len(), T::KIND.plural()),
    }
}

fn report_outcome<T: Screen>(outcome: &ReactivateOutcome, id: EntityId) {
    match outcome {
        ReactivateOutcome::Reactivated => println!(
            "{} Reactivated {} {}",
            style("✓").green(),
            T::KIND.singular(),
            style(id).cyan()
        ),
        ReactivateOutcome::Failed(message) => {
            eprintln!("{} {}", style("✗").red(), message)
        }
        ReactivateOutcome::Ignored => {}
    }
}

fn modal_error(view: &ModalView) -> miette::Report {
    match view {
        ModalView::Shown {
            body: ModalBody::Error(message),
            ..
        } => miette::miette!("{}", message),
        _ => miette::miette!("Failed to load records"),
    }
}

/// Render the modal the way the terminal shows it
pub fn render_modal(view: &ModalView) -> String {
    let ModalView::Shown { title, body } = view else {
        return String::new();
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", style(title).bold()));
    out.push_str(&format!("{}\n", style("─".repeat(50)).dim()));

    match body {
        ModalBody::Loading(message) => out.push_str(&format!("{}\n", style(message).dim())),
        ModalBody::Error(message) => {
            out.push_str(&format!("{} {}\n", style("✗").red(), style(message).red()))
        }
        ModalBody::Empty(message) => out.push_str(&format!("{}\n", message)),
        ModalBody::Table(table) => {
            let mut builder = Builder::default();
            builder.push_record(table.headers.clone());
            for row in &table.rows {
                let mut record = row.cells.clone();
                record.push(row.action.map(|a| format!("[{}]", a)).unwrap_or_default());
                builder.push_record(record);
            }
            out.push_str(&builder.build().with(Style::rounded()).to_string());
            out.push('\n');
        }
    }
    out
}

/// Replace reference ids given on the command line by the matching option
pub fn resolve_choices(
    mut flags: Map<String, Value>,
    choices: &FieldChoices,
) -> Result<Map<String, Value>> {
    for (field, options) in choices {
        let Some(given) = flags.get(field) else {
            continue;
        };
        let Some(index) = choice_index(options, given) else {
            let shown = given.get("id").unwrap_or(given);
            return Err(miette::miette!(
                "No active record with id {} for '{}'",
                shown,
                field
            ));
        };
        flags.insert(field.clone(), options[index].value.clone());
    }
    Ok(flags)
}

/// Set a form field when the flag was given
pub fn set_field<V: Into<Value>>(form: &mut Map<String, Value>, key: &str, value: Option<V>) {
    if let Some(value) = value {
        form.insert(key.to_string(), value.into());
    }
}

/// Options carrying the whole record (nested references)
pub fn record_choices<T: Record>(records: &[T]) -> Result<Vec<Choice>> {
    records
        .iter()
        .map(|record| {
            Ok(Choice {
                label: record.label(),
                value: serde_json::to_value(record).into_diagnostic()?,
            })
        })
        .collect()
}

/// Options carrying only the record id
pub fn id_choices<T: Record>(records: &[T]) -> Vec<Choice> {
    records
        .iter()
        .filter_map(|record| {
            Some(Choice {
                label: record.label(),
                value: Value::from(record.id()?.get()),
            })
        })
        .collect()
}

/// Load the active records a form picks from
pub async fn load_actives<T: Record>(ctx: &AppContext) -> Result<Vec<T>> {
    ctx.service::<T>()
        .get_actives()
        .await
        .map_err(|e| service_error(e, &format!("Failed to load {}", T::KIND.plural())))
}

/// Validate the filled-in form and build the record from it
fn validate_form<T: Record>(form: Value) -> Result<T> {
    Validator::default().validate(T::KIND, &form)?;
    serde_json::from_value(form).into_diagnostic()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reactivation::{ModalRow, ModalTable};
    use crate::entities::Subject;
    use serde_json::json;

    fn shown(body: ModalBody) -> ModalView {
        ModalView::Shown {
            title: "Inactive Students".to_string(),
            body,
        }
    }

    #[test]
    fn test_render_hidden_modal_is_empty() {
        assert_eq!(render_modal(&ModalView::Hidden), "");
    }

    #[test]
    fn test_render_empty_and_error_states() {
        let empty = render_modal(&shown(ModalBody::Empty("No inactive records found.".to_string())));
        assert!(empty.contains("Inactive Students"));
        assert!(empty.contains("No inactive records found."));

        let error = render_modal(&shown(ModalBody::Error("Servidor indisponível".to_string())));
        assert!(error.contains("Servidor indisponível"));
    }

    #[test]
    fn test_render_table_with_action_column() {
        let view = shown(ModalBody::Table(ModalTable {
            headers: vec!["ID".to_string(), "NAME".to_string(), "Actions".to_string()],
            rows: vec![ModalRow {
                id: Some(EntityId::new(1).unwrap()),
                cells: vec!["1".to_string(), "Ana".to_string()],
                action: Some("Reactivate"),
            }],
        }));
        let out = render_modal(&view);
        assert!(out.contains("Actions"));
        assert!(out.contains("Ana"));
        assert!(out.contains("[Reactivate]"));
    }

    #[test]
    fn test_resolve_choices_replaces_ids() {
        let mut choices = FieldChoices::new();
        choices.insert(
            "disciplina".to_string(),
            vec![Choice {
                label: "Cálculo".to_string(),
                value: json!({ "id": 2, "nome": "Cálculo", "carga_horaria": 4 }),
            }],
        );

        let mut flags = Map::new();
        flags.insert("codigoTurma".to_string(), json!("MAT-A"));
        flags.insert("disciplina".to_string(), json!({ "id": 2 }));

        let resolved = resolve_choices(flags, &choices).unwrap();
        assert_eq!(resolved["disciplina"]["nome"], "Cálculo");
        assert_eq!(resolved["codigoTurma"], "MAT-A");
    }

    #[test]
    fn test_choices_from_records() {
        let subjects = vec![
            Subject {
                id: Some(EntityId::new(2).unwrap()),
                name: "Cálculo".to_string(),
                weekly_hours: 4,
                active: Some(true),
                extra: Default::default(),
            },
            Subject {
                id: None,
                name: "Rascunho".to_string(),
                weekly_hours: 1,
                active: None,
                extra: Default::default(),
            },
        ];

        let ids = id_choices(&subjects);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].value, json!(2));
        assert_eq!(ids[0].label, "Cálculo");

        let full = record_choices(&subjects).unwrap();
        assert_eq!(full[0].value["nome"], "Cálculo");
    }

    #[test]
    fn test_set_field_skips_missing_flags() {
        let mut form = Map::new();
        set_field(&mut form, "nome", Some("Ana"));
        set_field::<String>(&mut form, "email", None);
        set_field(&mut form, "numero", Some(101u32));
        assert_eq!(form.len(), 2);
        assert_eq!(form["numero"], json!(101));
    }

    #[test]
    fn test_resolve_choices_rejects_unknown_id() {
        let mut choices = FieldChoices::new();
        choices.insert(
            "turma".to_string(),
            vec![Choice {
                label: "MAT-A - Cálculo".to_string(),
                value: json!(3),
            }],
        );
        let mut flags = Map::new();
        flags.insert("turma".to_string(), json!(9));

        let err = resolve_choices(flags, &choices).unwrap_err();
        assert!(err.to_string().contains("No active record with id 9"));
    }
}
