use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use console_application::filters::{ShopFilterForm, TaskDefinitionFilterForm};
use console_application::forms::{MerchantDraft, TaskDraft};
use console_application::AppState;
use console_domain::SyncOrderRequest;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::handlers::{
    diag_handlers, merchant_handlers, search_handlers, session_handlers, shop_handlers, task_handlers, Emit,
};
use crate::middleware::require_session;
use crate::views::Screen;

#[derive(Debug, Parser)]
#[command(name = "ops-console", version, about = "Operations console for the merchant task backend")]
pub struct Cli {
    /// Config file (defaults to $OPS_CONSOLE_CONFIG or ./ops-console.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with the console credentials
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        /// Bearer token sent with later requests
        #[arg(long)]
        token: Option<String>,
    },
    Logout,
    Whoami,
    #[command(subcommand)]
    Merchant(MerchantCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Instance(InstanceCommand),
    #[command(subcommand)]
    Subtask(SubtaskCommand),
    #[command(subcommand)]
    Shop(ShopCommand),
    #[command(subcommand)]
    Order(OrderCommand),
    /// Search crawled influencer data by influencer id
    Search {
        #[arg(default_value = "")]
        keyword: String,
        #[command(flatten)]
        paging: PageArgs,
    },
    #[command(subcommand)]
    Diag(DiagCommand),
}

#[derive(Debug, Subcommand)]
pub enum MerchantCommand {
    List {
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        admin_email: String,
        #[arg(long)]
        admin_password: String,
        #[arg(long)]
        admin_name: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        status: Option<String>,
    },
    /// Soft delete; the merchant becomes INACTIVE
    Deactivate { id: String },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    List {
        #[arg(long)]
        id: Option<String>,
        /// data_collection, review_task or all
        #[arg(long)]
        task_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Create {
        /// qianyi_sync, tiktok_review or fastmoss_crawl
        #[arg(long)]
        task_type: String,
        #[arg(long, default_value = "")]
        name: String,
        /// Target URL; repeat for several
        #[arg(long = "url")]
        urls: Vec<String>,
        #[arg(long, default_value = "")]
        remark: String,
    },
    Show { id: String },
    /// Create an instance from a definition
    Build { definition_id: String },
}

#[derive(Debug, Subcommand)]
pub enum InstanceCommand {
    List {
        definition_id: String,
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        watch: bool,
    },
    Run { instance_id: String },
}

#[derive(Debug, Subcommand)]
pub enum SubtaskCommand {
    List {
        instance_id: String,
        #[arg(long)]
        status: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
        #[arg(long)]
        watch: bool,
    },
    Show {
        id: String,
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ShopCommand {
    List {
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        site_code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        auth_status: Option<String>,
        #[command(flatten)]
        paging: PageArgs,
    },
    Sync,
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    Sync {
        #[arg(long)]
        merchant_id: Option<u64>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        shop: Option<String>,
        #[arg(long)]
        order_number: Option<String>,
        #[arg(long)]
        online_order_number: Option<String>,
        #[arg(long)]
        fuzzy_online_order_number: Option<String>,
        #[arg(long)]
        include_deleted: bool,
        #[arg(long)]
        order_tag: Option<i64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DiagCommand {
    /// Print in-process counters as Prometheus text
    Metrics,
}

impl Command {
    pub fn is_public(&self) -> bool {
        matches!(self, Command::Login { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Whoami => "whoami",
            Command::Merchant(_) => "merchant",
            Command::Task(_) => "task",
            Command::Instance(_) => "instance",
            Command::Subtask(_) => "subtask",
            Command::Shop(_) => "shop",
            Command::Order(_) => "order",
            Command::Search { .. } => "search",
            Command::Diag(_) => "diag",
        }
    }
}

/// Runs `command` behind the session gate. Each emitted screen carries the
/// notices posted since the previous one.
pub async fn dispatch(
    state: &AppState,
    command: Command,
    cancel: CancellationToken,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    require_session(state, &command).await?;

    let mut notices = state.notices.subscribe();
    let mut sink = |mut screen: Screen| {
        loop {
            match notices.try_recv() {
                Ok(notice) => screen.notices.push(notice),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        emit(screen);
    };
    route(state, command, cancel, &mut sink).await
}

async fn route(
    state: &AppState,
    command: Command,
    cancel: CancellationToken,
    emit: Emit<'_>,
) -> Result<(), CliError> {
    match command {
        Command::Login {
            username,
            password,
            token,
        } => session_handlers::login(state, &username, &password, token, emit).await,
        Command::Logout => session_handlers::logout(state, emit).await,
        Command::Whoami => session_handlers::whoami(state, emit).await,

        Command::Merchant(MerchantCommand::List { status, paging }) => {
            merchant_handlers::list_merchants(state, status, paging.page, paging.page_size, emit).await
        }
        Command::Merchant(MerchantCommand::Create {
            name,
            description,
            admin_email,
            admin_password,
            admin_name,
        }) => {
            let draft = MerchantDraft {
                name,
                description,
                admin_email,
                admin_password,
                admin_name,
                status: None,
            };
            merchant_handlers::create_merchant(state, &draft, emit).await
        }
        Command::Merchant(MerchantCommand::Update {
            id,
            name,
            description,
            status,
        }) => {
            let draft = MerchantDraft {
                name,
                description,
                status,
                ..Default::default()
            };
            merchant_handlers::update_merchant(state, &id, &draft, emit).await
        }
        Command::Merchant(MerchantCommand::Deactivate { id }) => {
            merchant_handlers::deactivate_merchant(state, &id, emit).await
        }

        Command::Task(TaskCommand::List {
            id,
            task_type,
            status,
            from,
            to,
            paging,
        }) => {
            let form = TaskDefinitionFilterForm {
                task_definition_id: id,
                task_type,
                status,
                date_range: from.zip(to),
            };
            task_handlers::list_definitions(state, form, paging.page, paging.page_size, emit).await
        }
        Command::Task(TaskCommand::Create {
            task_type,
            name,
            urls,
            remark,
        }) => {
            let draft = TaskDraft {
                task_type,
                name,
                urls: urls.join("\n"),
                remark,
            };
            task_handlers::create_definition(state, draft, emit).await
        }
        Command::Task(TaskCommand::Show { id }) => task_handlers::show_definition(state, &id, emit).await,
        Command::Task(TaskCommand::Build { definition_id }) => {
            task_handlers::build_instance(state, &definition_id, emit).await
        }

        Command::Instance(InstanceCommand::List {
            definition_id,
            paging,
            watch,
        }) => {
            task_handlers::list_instances(
                state,
                &definition_id,
                paging.page,
                paging.page_size,
                watch,
                cancel,
                emit,
            )
            .await
        }
        Command::Instance(InstanceCommand::Run { instance_id }) => {
            task_handlers::run_instance(state, &instance_id, emit).await
        }

        Command::Subtask(SubtaskCommand::List {
            instance_id,
            status,
            paging,
            watch,
        }) => {
            task_handlers::list_sub_tasks(
                state,
                &instance_id,
                status,
                paging.page,
                paging.page_size,
                watch,
                cancel,
                emit,
            )
            .await
        }
        Command::Subtask(SubtaskCommand::Show { id, watch }) => {
            task_handlers::show_sub_task(state, &id, watch, cancel, emit).await
        }

        Command::Shop(ShopCommand::List {
            platform,
            status,
            site_code,
            name,
            auth_status,
            paging,
        }) => {
            let form = ShopFilterForm {
                platform,
                status,
                site_code,
                name,
                auth_expired_status: auth_status,
            };
            shop_handlers::list_shops(state, form, paging.page, paging.page_size, emit).await
        }
        Command::Shop(ShopCommand::Sync) => shop_handlers::sync_shops(state, emit).await,

        Command::Order(OrderCommand::Sync {
            merchant_id,
            page,
            page_size,
            status,
            shop,
            order_number,
            online_order_number,
            fuzzy_online_order_number,
            include_deleted,
            order_tag,
        }) => {
            let request = SyncOrderRequest {
                merchant_id,
                page,
                page_size,
                status,
                shop,
                order_number,
                online_order_number,
                fuzzy_online_order_number,
                includes_soft_del: include_deleted.then_some(true),
                order_tag,
            };
            shop_handlers::sync_orders(state, &request, emit).await
        }

        Command::Search { keyword, paging } => {
            search_handlers::search(state, &keyword, paging.page, paging.page_size, emit).await
        }
        Command::Diag(DiagCommand::Metrics) => diag_handlers::metrics_prometheus(state, emit).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_application::testing::{test_state, FakeBackend, FakeMethod};
    use console_application::NoticeLevel;
    use serde_json::json;
    use std::sync::Arc;

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["ops-console"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("parse").command
    }

    #[test]
    fn repeated_url_flags_collect() {
        let command = parse(&[
            "task",
            "create",
            "--task-type",
            "fastmoss_crawl",
            "--url",
            "https://a.test/1",
            "--url",
            "https://a.test/2",
        ]);
        match command {
            Command::Task(TaskCommand::Create { urls, .. }) => assert_eq!(urls.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn date_range_needs_both_ends() {
        let argv = ["ops-console", "task", "list", "--from", "2024-03-01"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn search_accepts_paging_flags() {
        match parse(&["search", "influencer123", "--page", "3", "--page-size", "20"]) {
            Command::Search { keyword, paging } => {
                assert_eq!(keyword, "influencer123");
                assert_eq!(paging.page, 3);
                assert_eq!(paging.page_size, Some(20));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn gate_blocks_logged_out_session() {
        let api = Arc::new(FakeBackend::new());
        let state = test_state(api.clone()).await;
        state.session.logout().await.expect("logout");

        let err = dispatch(&state, parse(&["shop", "sync"]), CancellationToken::new(), &mut |_| {})
            .await
            .expect_err("gated");
        assert!(matches!(err, CliError::Unauthorized));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn screens_carry_notices_posted_during_command() {
        let api = Arc::new(FakeBackend::new());
        api.respond(
            FakeMethod::Post,
            "/store-info/sync",
            json!({ "success": true, "count": 37 }),
        );
        let state = test_state(api).await;
        let mut screens = Vec::new();

        dispatch(&state, parse(&["shop", "sync"]), CancellationToken::new(), &mut |screen| {
            screens.push(screen)
        })
        .await
        .expect("dispatch");

        assert_eq!(screens.len(), 1);
        assert_eq!(screens[0].notices.len(), 1);
        assert_eq!(screens[0].notices[0].level, NoticeLevel::Success);
        assert!(screens[0].render().contains("37"));
    }

    #[tokio::test]
    async fn order_sync_flags_map_to_request_body() {
        let api = Arc::new(FakeBackend::new());
        api.respond(FakeMethod::Post, "/order/sync", json!({ "success": true, "count": 0 }));
        let state = test_state(api.clone()).await;

        dispatch(
            &state,
            parse(&["order", "sync", "--merchant-id", "4", "--include-deleted"]),
            CancellationToken::new(),
            &mut |_| {},
        )
        .await
        .expect("dispatch");

        assert_eq!(
            api.last_body(FakeMethod::Post, "/order/sync"),
            Some(json!({ "merchantId": 4, "includesSoftDel": true }))
        );
    }
}
