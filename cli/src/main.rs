use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use encenape::config::{ClientConfig, ConfigError};
use encenape::forms::account::{ChangePasswordForm, ProfileForm};
use encenape::forms::auth::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use encenape::forms::storefront::{ContactForm, PurchaseForm};
use encenape::net::types::{EventFilter, PageRequest};
use encenape::net::{ApiClient, ApiError, events, faq, messages, tickets};
use encenape::state::{Access, Auth, SessionStore};
use encenape::util::nav::LogNavigator;
use encenape::util::notify::TracingNotifier;
use encenape::util::storage::FileStore;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("not logged in; run `encenape auth login` first")]
    NotLoggedIn,
    #[error("admin role required")]
    Forbidden,
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "encenape", about = "Theatre ticket storefront CLI")]
struct Cli {
    #[arg(long, env = "ENCENAPE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "ENCENAPE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Auth(AuthCommand),
    Profile(ProfileCommand),
    Events(EventsCommand),
    Tickets(TicketsCommand),
    Faq(FaqCommand),
    Messages(MessagesCommand),
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Login {
        email: String,
        #[arg(long, env = "ENCENAPE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ENCENAPE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Forgot {
        email: String,
    },
    Reset {
        #[arg(long)]
        email: String,
        #[arg(long)]
        token: String,
        #[arg(long, env = "ENCENAPE_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    page: u32,
    #[arg(long, default_value_t = 10)]
    size: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest { page: args.page, size: args.size }
    }
}

#[derive(Args, Debug)]
struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Subcommand, Debug)]
enum EventsSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: i64,
    },
    Upcoming {
        #[command(flatten)]
        page: PageArgs,
    },
    Available,
    Categories,
    Cities,
    /// Admin listing, including inactive events.
    Admin {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Admin: deactivate an event.
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct TicketsCommand {
    #[command(subcommand)]
    command: TicketsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TicketsSubcommand {
    Buy {
        event_id: i64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
    },
    Mine {
        #[arg(long, default_value_t = false)]
        active: bool,
    },
    Show {
        code: String,
    },
    Cancel {
        id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Args, Debug)]
struct FaqCommand {
    #[command(subcommand)]
    command: FaqSubcommand,
}

#[derive(Subcommand, Debug)]
enum FaqSubcommand {
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Search {
        query: String,
    },
    Categories,
}

#[derive(Args, Debug)]
struct MessagesCommand {
    #[command(subcommand)]
    command: MessagesSubcommand,
}

#[derive(Subcommand, Debug)]
enum MessagesSubcommand {
    Send {
        text: String,
        #[arg(long)]
        sender: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Admin: list messages.
    List {
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Admin: answer a message.
    Reply {
        id: i64,
        text: String,
    },
}

#[tokio::main]
async fn main() {
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("ignoring unreadable .env: {e}"),
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        if let CliError::Api(api) = &e {
            for (field, message) in &api.fields {
                eprintln!("  {field}: {message}");
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = ClientConfig::for_url(&url).api_url;
    }
    if let Some(path) = cli.session_file {
        config.session_file = path;
    }

    let session = Arc::new(SessionStore::new(Arc::new(FileStore::new(&config.session_file))));
    let api = ApiClient::builder(config)
        .session(session)
        .notifier(Arc::new(TracingNotifier))
        .navigator(Arc::new(LogNavigator))
        .build()?;
    let auth = Auth::new(api);
    auth.initialize();

    match cli.command {
        Command::Auth(cmd) => run_auth(&auth, cmd.command).await,
        Command::Profile(cmd) => run_profile(&auth, cmd.command).await,
        Command::Events(cmd) => run_events(&auth, cmd.command).await,
        Command::Tickets(cmd) => run_tickets(&auth, cmd.command).await,
        Command::Faq(cmd) => run_faq(&auth, cmd.command).await,
        Command::Messages(cmd) => run_messages(&auth, cmd.command).await,
    }
}

fn require(auth: &Auth, admin: bool) -> Result<(), CliError> {
    match auth.access(admin) {
        Access::Granted => Ok(()),
        Access::Forbidden => Err(CliError::Forbidden),
        Access::Loading | Access::RedirectToLogin => Err(CliError::NotLoggedIn),
    }
}

async fn run_auth(auth: &Auth, cmd: AuthSubcommand) -> Result<(), CliError> {
    match cmd {
        AuthSubcommand::Login { email, password } => {
            let user = LoginForm { email, password }.submit(auth).await?;
            print_json(&user)
        }
        AuthSubcommand::Register { name, email, password } => {
            let form = RegisterForm { name, email, confirm_password: password.clone(), password };
            let user = form.submit(auth).await?;
            print_json(&user)
        }
        AuthSubcommand::Logout => {
            auth.logout();
            Ok(())
        }
        AuthSubcommand::Whoami => {
            require(auth, false)?;
            let user = auth.reload_user().await?;
            print_json(&user)
        }
        AuthSubcommand::Forgot { email } => {
            ForgotPasswordForm { email }.submit(auth).await?;
            Ok(())
        }
        AuthSubcommand::Reset { email, token, password } => {
            let form = ResetPasswordForm { email, token, confirm_password: password.clone(), new_password: password };
            form.submit(auth).await?;
            Ok(())
        }
    }
}

async fn run_profile(auth: &Auth, cmd: ProfileSubcommand) -> Result<(), CliError> {
    require(auth, false)?;
    match cmd {
        ProfileSubcommand::Show => match auth.state().user() {
            Some(user) => print_json(user),
            None => Err(CliError::NotLoggedIn),
        },
        ProfileSubcommand::Update { name, email, phone, avatar_url, bio } => {
            let user = ProfileForm { name, email, phone, avatar_url, bio }.submit(auth).await?;
            print_json(&user)
        }
        ProfileSubcommand::Password { current, new } => {
            let form = ChangePasswordForm { current_password: current, confirm_password: new.clone(), new_password: new };
            form.submit(auth).await?;
            Ok(())
        }
    }
}

async fn run_events(auth: &Auth, cmd: EventsSubcommand) -> Result<(), CliError> {
    let api = auth.api();
    match cmd {
        EventsSubcommand::List { category, city, search, page } => {
            let filter = EventFilter { category, city, search, ..EventFilter::default() }.with_page(page.into());
            print_json(&events::list(api, &filter).await?)
        }
        EventsSubcommand::Show { id } => print_json(&events::by_id(api, id).await?),
        EventsSubcommand::Upcoming { page } => print_json(&events::upcoming_page(api, page.into()).await?),
        EventsSubcommand::Available => print_json(&events::available(api).await?),
        EventsSubcommand::Categories => print_json(&events::categories(api).await?),
        EventsSubcommand::Cities => print_json(&events::cities(api).await?),
        EventsSubcommand::Admin { page } => {
            require(auth, true)?;
            print_json(&events::admin_list(api, page.into()).await?)
        }
        EventsSubcommand::Delete { id } => {
            require(auth, true)?;
            println!("{}", events::delete(api, id).await?);
            Ok(())
        }
    }
}

async fn run_tickets(auth: &Auth, cmd: TicketsSubcommand) -> Result<(), CliError> {
    let api = auth.api();
    match cmd {
        TicketsSubcommand::Buy { event_id, quantity } => {
            require(auth, false)?;
            let event = events::by_id(api, event_id).await?;
            let ticket = PurchaseForm::for_event(&event, quantity).submit(auth).await?;
            print_json(&ticket)
        }
        TicketsSubcommand::Mine { active } => {
            require(auth, false)?;
            let list = if active { tickets::mine_active(api).await? } else { tickets::mine(api).await? };
            print_json(&list)
        }
        TicketsSubcommand::Show { code } => print_json(&tickets::by_code(api, &code).await?),
        TicketsSubcommand::Cancel { id, reason } => {
            require(auth, false)?;
            println!("{}", tickets::cancel(api, id, reason.as_deref()).await?);
            Ok(())
        }
    }
}

async fn run_faq(auth: &Auth, cmd: FaqSubcommand) -> Result<(), CliError> {
    let api = auth.api();
    match cmd {
        FaqSubcommand::List { category: Some(category) } => print_json(&faq::by_category(api, &category).await?),
        FaqSubcommand::List { category: None } => print_json(&faq::list(api).await?),
        FaqSubcommand::Search { query } => print_json(&faq::search(api, &query).await?),
        FaqSubcommand::Categories => print_json(&faq::categories(api).await?),
    }
}

async fn run_messages(auth: &Auth, cmd: MessagesSubcommand) -> Result<(), CliError> {
    let api = auth.api();
    match cmd {
        MessagesSubcommand::Send { text, sender, email } => {
            let created = ContactForm { sender, text, contact_email: email }.submit(auth).await?;
            print_json(&created)
        }
        MessagesSubcommand::List { open } => {
            require(auth, true)?;
            let list = if open { messages::open(api).await? } else { messages::list(api).await? };
            print_json(&list)
        }
        MessagesSubcommand::Reply { id, text } => {
            require(auth, true)?;
            print_json(&messages::reply(api, id, &text).await?)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
