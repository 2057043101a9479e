//! `academia turma-alunos` command - Class enrollments

use async_trait::async_trait;
use clap::Subcommand;
use miette::Result;
use serde_json::{Map, Value};

use crate::cli::screens::{
    self, id_choices, load_actives, set_field, AppContext, DeleteArgs, ListArgs, ReactivateArgs,
    Screen, ShowArgs,
};
use crate::cli::table::{CellValue, ColumnDef, TableRow};
use crate::core::entity::Record;
use crate::core::identity::EntityId;
use crate::entities::{Class, Enrollment, Student};
use crate::schema::wizard::FieldChoices;

#[derive(Subcommand, Debug)]
pub enum EnrollmentCommands {
    /// List active enrollments
    List(ListArgs),

    /// Enroll a student in a class
    New(NewArgs),

    /// Show an enrollment
    Show(ShowArgs),

    /// Move an enrollment to another class or student
    Edit(EditArgs),

    /// Deactivate an enrollment
    Delete(DeleteArgs),

    /// Reactivate inactive enrollments
    Reactivate(ReactivateArgs),

    /// List inactive enrollments
    Inactive,
}

#[derive(clap::Args, Debug, Default)]
pub struct EnrollmentFields {
    /// Class id
    #[arg(long, value_name = "ID")]
    pub class: Option<u64>,

    /// Student id
    #[arg(long, value_name = "ID")]
    pub student: Option<u64>,

    #[arg(long)]
    pub active: Option<bool>,
}

impl EnrollmentFields {
    pub fn form(&self) -> Map<String, Value> {
        let mut form = Map::new();
        set_field(&mut form, "turma", self.class);
        set_field(&mut form, "aluno", self.student);
        set_field(&mut form, "ativo", self.active);
        form
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: EnrollmentFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Enrollment id
    pub id: EntityId,

    #[command(flatten)]
    pub fields: EnrollmentFields,

    /// Prompt for every field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 8),
    ColumnDef::new("class", "CLASS", 10),
    ColumnDef::new("student", "STUDENT", 10),
];

fn reference(id: u64) -> CellValue {
    i64::try_from(id).map_or_else(|_| CellValue::Text(id.to_string()), CellValue::Number)
}

#[async_trait]
impl Screen for Enrollment {
    const COLUMNS: &'static [ColumnDef] = COLUMNS;

    fn row(&self) -> TableRow {
        TableRow::new(self.id)
            .cell("id", self.id.map_or(CellValue::Empty, CellValue::Id))
            .cell("class", reference(self.class_id))
            .cell("student", reference(self.student_id))
    }

    fn heading(&self) -> String {
        self.label()
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Class", format!("#{}", self.class_id)),
            ("Student", format!("#{}", self.student_id)),
        ]
    }

    async fn form_choices(ctx: &AppContext) -> Result<FieldChoices> {
        let classes = load_actives::<Class>(ctx).await?;
        let students = load_actives::<Student>(ctx).await?;
        if classes.is_empty() || students.is_empty() {
            return Err(miette::miette!(
                help = "Register them with: academia turmas new / academia alunos new",
                "To create an enrollment, classes and students must be registered first."
            ));
        }

        let mut choices = FieldChoices::new();
        choices.insert("turma".to_string(), id_choices(&classes));
        choices.insert("aluno".to_string(), id_choices(&students));
        Ok(choices)
    }
}

pub async fn run(cmd: EnrollmentCommands, ctx: &AppContext) -> Result<()> {
    match cmd {
        EnrollmentCommands::List(args) => screens::list::<Enrollment>(ctx, &args).await,
        EnrollmentCommands::New(args) => {
            screens::create::<Enrollment>(ctx, args.fields.form(), args.interactive).await
        }
        EnrollmentCommands::Show(args) => screens::show::<Enrollment>(ctx, args.id).await,
        EnrollmentCommands::Edit(args) => {
            screens::edit::<Enrollment>(ctx, args.id, args.fields.form(), args.interactive).await
        }
        EnrollmentCommands::Delete(args) => screens::delete::<Enrollment>(ctx, &args).await,
        EnrollmentCommands::Reactivate(args) => {
            screens::reactivate::<Enrollment>(ctx, &args).await
        }
        EnrollmentCommands::Inactive => screens::inactive::<Enrollment>(ctx).await,
    }
}
