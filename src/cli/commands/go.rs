//! `academia go` command - Open a page by path

use miette::Result;
use serde_json::Map;

use crate::cli::commands::home;
use crate::cli::screens::{self, AppContext, ListArgs, Screen};
use crate::cli::GlobalOpts;
use crate::core::identity::EntityKind;
use crate::core::route::Route;
use crate::entities::{Class, Enrollment, Room, Student, Subject};

#[derive(clap::Args, Debug)]
pub struct GoArgs {
    /// Page path: /, /alunos, /alunos/novo, /alunos/editar/3, /alunos/3
    pub path: String,
}

pub async fn run(args: GoArgs, global: &GlobalOpts) -> Result<()> {
    let route = Route::parse(&args.path).map_err(|e| {
        miette::miette!(
            help = "Known pages: /, /alunos, /disciplinas, /salas, /turmas, /turma-alunos",
            "{}",
            e
        )
    })?;
    tracing::debug!(%route, "opening page");

    let Some(kind) = route.kind() else {
        return home::run();
    };
    let ctx = AppContext::new(global.clone())?;

    match kind {
        EntityKind::Student => open::<Student>(route, &ctx).await,
        EntityKind::Subject => open::<Subject>(route, &ctx).await,
        EntityKind::Room => open::<Room>(route, &ctx).await,
        EntityKind::Class => open::<Class>(route, &ctx).await,
        EntityKind::Enrollment => open::<Enrollment>(route, &ctx).await,
    }
}

async fn open<T: Screen>(route: Route, ctx: &AppContext) -> Result<()> {
    match route {
        Route::Home => home::run(),
        Route::List(_) => screens::list::<T>(ctx, &ListArgs::default()).await,
        Route::New(_) => screens::create::<T>(ctx, Map::new(), true).await,
        Route::Edit(_, id) => screens::edit::<T>(ctx, id, Map::new(), true).await,
        Route::Detail(_, id) => screens::show::<T>(ctx, id).await,
    }
}
