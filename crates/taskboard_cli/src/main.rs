//! Command-line front end for the todo dashboard.
//!
//! # Responsibility
//! - Map subcommands onto `SessionStore`, `TodoBoard` and `LoginFlow`.
//! - Print the notifications each action produced.
//!
//! # Invariants
//! - The selected user is remembered in the local preference database.
//! - Todo writes require a selected user.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use taskboard_core::db::open_db;
use taskboard_core::{
    init_logging, ApiClient, ClientConfig, LoginFlow, NewUser, Notifications, Priority,
    SessionStore, SqlitePreferenceRepository, TagAddOutcome, Todo, TodoBoard, TodoForm,
    TodoListQuery, User,
};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Todo dashboard client")]
#[command(version)]
struct Cli {
    /// Backend root, overrides TASKBOARD_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roster commands
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Select the current user by id
    Login { user_id: String },
    /// Show the current user
    Whoami,
    /// Todo commands
    Todos {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Append a note to a todo as the current user
    Note { todo_id: String, content: String },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum TodoAction {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        tag: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        /// Tags to add
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Tags to remove
        #[arg(long = "untag")]
        untags: Vec<String>,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("logging disabled: {err}");
    }

    let client = ApiClient::from_config(&config)?;
    let mut session = open_session(&config, client.clone()).await?;

    match cli.command {
        Commands::Users { action } => run_users(action, &mut session).await,
        Commands::Login { user_id } => {
            let user = LoginFlow::new().select_existing(&mut session, &user_id)?;
            println!("logged in as {} ({})", user.username, user.id);
            Ok(())
        }
        Commands::Whoami => {
            match session.current_user() {
                Some(user) => println!("{} ({}) {}", user.username, user.id, user.display_name()),
                None => println!("no user selected"),
            }
            Ok(())
        }
        Commands::Todos { action } => {
            let query = TodoListQuery::page(1, config.page_size);
            let mut board = TodoBoard::with_query(client, query);
            let result = run_todos(action, &mut board, session.current_user()).await;
            flush(board.notifications_mut());
            result
        }
        Commands::Note { todo_id, content } => {
            let author = session
                .current_user()
                .cloned()
                .ok_or_else(|| anyhow!("no user selected; run `taskboard login <id>`"))?;
            let mut board = TodoBoard::new(client);
            let result = board.add_note(&todo_id, &content, &author).await;
            flush(board.notifications_mut());
            match result? {
                Some(todo) => print_detail(&todo.resolved_with(session.users())),
                None => println!("empty note ignored"),
            }
            Ok(())
        }
    }
}

async fn open_session(config: &ClientConfig, client: ApiClient) -> Result<SessionStore<ApiClient>> {
    let mut session = SessionStore::new(client);
    match open_db(config.db_path()) {
        Ok(conn) => {
            let prefs = SqlitePreferenceRepository::try_new(conn)
                .context("preference store is missing its tables")?;
            session = session.with_preferences(Box::new(prefs));
        }
        Err(err) => warn!("event=preference_open module=cli status=error error={err}"),
    }
    let result = session.init().await;
    flush(session.notifications_mut());
    result.context("failed to load users")?;
    Ok(session)
}

async fn run_users(action: UserAction, session: &mut SessionStore<ApiClient>) -> Result<()> {
    match action {
        UserAction::List => {
            let current = session.current_user().map(|user| user.id.clone());
            for user in session.users() {
                let marker = if current.as_deref() == Some(user.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {:<26} {:<16} {:<4} {}",
                    user.id,
                    user.username,
                    user.initials(),
                    user.email
                );
            }
            Ok(())
        }
        UserAction::Register {
            username,
            name,
            email,
            password,
        } => {
            let mut flow = LoginFlow::new();
            let result = flow
                .register(
                    session,
                    NewUser {
                        username,
                        name,
                        email,
                    },
                    &password,
                )
                .await;
            flush(session.notifications_mut());
            let created = result?;
            println!("registered {} ({})", created.username, created.id);
            Ok(())
        }
    }
}

async fn run_todos(
    action: TodoAction,
    board: &mut TodoBoard<ApiClient>,
    current_user: Option<&User>,
) -> Result<()> {
    match action {
        TodoAction::List {
            page,
            limit,
            priority,
            tag,
        } => {
            let mut query = TodoListQuery::page(page, limit.unwrap_or(board.query().limit));
            if let Some(priority) = priority {
                query = query.with_filter("priority", priority.as_str());
            }
            if let Some(tag) = tag {
                query = query.with_filter("tag", tag);
            }
            board.list(query).await?;
            let pagination = board.pagination();
            for todo in board.todos() {
                print_row(todo);
            }
            println!(
                "page {}/{} ({} total)",
                pagination.page, pagination.pages, pagination.total
            );
            Ok(())
        }
        TodoAction::Show { id } => {
            board.load().await?;
            let roster = board.users().to_vec();
            let todo = board.view(&id).await?;
            print_detail(&todo.resolved_with(&roster));
            Ok(())
        }
        TodoAction::Create {
            title,
            description,
            priority,
            tags,
        } => {
            board.load().await?;
            let mut form = TodoForm::new();
            form.title = title;
            form.priority = priority;
            form.set_description(description, board.users());
            add_tags(&mut form, &tags);
            let created = board.submit(&mut form, current_user).await?;
            println!("created {}", created.id);
            Ok(())
        }
        TodoAction::Update {
            id,
            title,
            description,
            priority,
            tags,
            untags,
        } => {
            board.load().await?;
            let existing = board.fetch_one(&id).await?;
            let mut form = TodoForm::for_todo(&existing);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(priority) = priority {
                form.priority = priority;
            }
            if let Some(description) = description {
                let roster = board.users().to_vec();
                form.set_description(description, &roster);
            }
            add_tags(&mut form, &tags);
            for tag in &untags {
                if !form.remove_tag(&tag.trim().to_lowercase()) {
                    warn!("event=tag_remove module=cli status=skipped tag={tag}");
                }
            }
            let updated = board.submit(&mut form, current_user).await?;
            println!("updated {}", updated.id);
            Ok(())
        }
        TodoAction::Delete { id } => {
            board.delete(&id).await?;
            println!("deleted {id}");
            Ok(())
        }
    }
}

fn add_tags(form: &mut TodoForm, tags: &[String]) {
    for raw in tags {
        match form.add_tag(raw) {
            TagAddOutcome::Added(_) => {}
            TagAddOutcome::Empty => warn!("event=tag_add module=cli status=skipped reason=empty"),
            TagAddOutcome::Duplicate(tag) => {
                warn!("event=tag_add module=cli status=skipped reason=duplicate tag={tag}")
            }
        }
    }
}

fn print_row(todo: &Todo) {
    let tags = todo
        .tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "{:<26} [{:<6}] {} {} by {}",
        todo.id,
        todo.priority,
        todo.title,
        tags,
        todo.created_by.label()
    );
}

fn print_detail(todo: &Todo) {
    print_row(todo);
    println!();
    println!("{}", todo.description);
    if !todo.mentioned_users.is_empty() {
        let mentions = todo
            .mentioned_users
            .iter()
            .map(|user| user.label().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("mentions: {mentions}");
    }
    if todo.notes.is_empty() {
        return;
    }
    println!("notes:");
    for note in &todo.notes {
        println!("  - {} ({}): {}", note.created_by.label(), note.created_at, note.content);
    }
}

fn flush(notifications: &mut Notifications) {
    for notification in notifications.drain() {
        eprintln!("{notification}");
    }
}
