use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rentride::app::App;
use rentride::config::{ClientConfig, ConfigError};
use rentride::estimate::{Blocked, parse_local};
use rentride::net::ApiError;
use rentride::net::types::{Booking, BookingStatus, Vehicle, VehicleForm};
use rentride::pages::admin::{bookings, stat_cards, users};
use rentride::pages::{
    AdminDashboard, AdminTab, BookingPage, LoginPage, ManageBookings, ManageUsers, ManageVehicles, ProfilePage,
    RegisterForm, RegisterPage, VehicleDetailsPage, VehicleListPage,
};
use rentride::routing::{LocationState, Navigation, Route};
use rentride::state::MissingProvider;
use rentride::util::{display_date, format_money};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("api client error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Provider(#[from] MissingProvider),
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("sign in required for {from}; run `rentride login` first")]
    SignInRequired { from: String },
    #[error("{path} is restricted to administrators")]
    Forbidden { path: String },
    #[error("session is still loading")]
    Hydrating,
    #[error("{0}")]
    Rejected(String),
    #[error("invalid date-time `{0}`; expected YYYY-MM-DDTHH:MM")]
    InvalidDateTime(String),
    #[error("aborted")]
    Aborted,
}

#[derive(Parser, Debug)]
#[command(name = "rentride", about = "RentRide vehicle rental client")]
struct Cli {
    #[arg(long, env = "RENTRIDE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "RENTRIDE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "RENTRIDE_PASSWORD", hide_env_values = true, help = "Read from stdin when omitted")]
        password: Option<String>,
    },
    Logout,
    /// Create a customer account.
    Register(RegisterArgs),
    Whoami,
    Vehicles(VehiclesCommand),
    /// Book a vehicle for a rental window.
    Book {
        vehicle_id: String,
        #[arg(long, help = "Pickup, YYYY-MM-DDTHH:MM")]
        start: String,
        #[arg(long, help = "Return, YYYY-MM-DDTHH:MM")]
        end: String,
    },
    /// Show your account and booking history.
    Profile,
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "RENTRIDE_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
}

#[derive(Args, Debug)]
struct VehiclesCommand {
    #[command(subcommand)]
    command: VehiclesSubcommand,
}

#[derive(Subcommand, Debug)]
enum VehiclesSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "type", default_value = "all")]
        kind: String,
    },
    Show {
        id: String,
    },
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Stats,
    Vehicles(AdminVehiclesCommand),
    Users(AdminUsersCommand),
    Bookings(AdminBookingsCommand),
}

#[derive(Args, Debug)]
struct AdminVehiclesCommand {
    #[command(subcommand)]
    command: AdminVehiclesSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminVehiclesSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Create(VehicleFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: VehicleFields,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

/// Unset fields keep the form's current value.
#[derive(Args, Debug)]
struct VehicleFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    kind: Option<String>,
    #[arg(long)]
    registration: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    status: Option<String>,
}

#[derive(Args, Debug)]
struct AdminUsersCommand {
    #[command(subcommand)]
    command: AdminUsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminUsersSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    ToggleRole {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct AdminBookingsCommand {
    #[command(subcommand)]
    command: AdminBookingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminBookingsSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Return {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    Cancel {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = cli.session_file {
        config = config.with_session_file(path);
    }

    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "starting");
    let app = App::new(&config)?;
    app.start().await;

    match cli.command {
        Command::Login { email, password } => run_login(&app, &email, password).await,
        Command::Logout => {
            app.auth().logout();
            println!("signed out");
            Ok(())
        }
        Command::Register(args) => run_register(&app, args).await,
        Command::Whoami => {
            match app.auth().user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Vehicles(vehicles) => run_vehicles(&app, vehicles).await,
        Command::Book { vehicle_id, start, end } => run_book(&app, &vehicle_id, &start, &end).await,
        Command::Profile => run_profile(&app).await,
        Command::Admin(admin) => run_admin(&app, admin).await,
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Resolve `route` like a browser navigation. Only a `Render` of that same
/// route lets the command go on to build its page and fetch.
fn enter(app: &App, route: Route) -> Result<LocationState, CliError> {
    let path = route.path();
    match app.navigate_to(route, LocationState::default()) {
        Navigation::Render { state, .. } => Ok(state),
        Navigation::Redirect { to: Route::Login, state } => {
            Err(CliError::SignInRequired { from: state.from.unwrap_or(path) })
        }
        Navigation::Redirect { .. } => Err(CliError::Forbidden { path }),
        Navigation::Pending(_) => Err(CliError::Hydrating),
    }
}

fn rejected(error: Option<String>) -> CliError {
    CliError::Rejected(error.unwrap_or_else(|| "request failed".to_owned()))
}

// =============================================================================
// ACCOUNT
// =============================================================================

async fn run_login(app: &App, email: &str, password: Option<String>) -> Result<(), CliError> {
    let location = enter(app, Route::Login)?;
    let password = match password {
        Some(password) => password,
        None => prompt_line("Password: ")?,
    };

    let page = LoginPage::new(app.scope(), &location)?;
    if page.submit(email, &password).await.is_none() {
        return Err(rejected(page.state().error));
    }
    if let Some(user) = app.auth().user() {
        println!("signed in as {} ({})", user.name, user.role);
    }
    Ok(())
}

async fn run_register(app: &App, args: RegisterArgs) -> Result<(), CliError> {
    enter(app, Route::Register)?;
    let page = RegisterPage::new(app.scope())?;
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        password: args.password,
        phone: args.phone,
        address: args.address,
    };
    match page.submit(&form).await {
        Some(next) => {
            println!("{}", next.state.message.unwrap_or_default());
            Ok(())
        }
        None => Err(rejected(page.state().error)),
    }
}

async fn run_profile(app: &App) -> Result<(), CliError> {
    let location = enter(app, Route::Profile)?;
    let page = ProfilePage::new(app.scope(), &location)?;
    page.load().await;
    let state = page.state();
    if let Some(error) = state.error {
        return Err(CliError::Rejected(error));
    }

    if let Some(user) = &state.user {
        println!("{} <{}> ({})", user.name, user.email, user.role);
    }
    if state.bookings.is_empty() {
        println!("You haven't made any bookings yet.");
    }
    for booking in &state.bookings {
        print_booking(booking);
    }
    Ok(())
}

// =============================================================================
// FLEET
// =============================================================================

async fn run_vehicles(app: &App, vehicles: VehiclesCommand) -> Result<(), CliError> {
    match vehicles.command {
        VehiclesSubcommand::List { search, kind } => {
            enter(app, Route::Vehicles)?;
            let page = VehicleListPage::new(app.scope())?;
            page.load().await;
            page.set_search(&search);
            page.set_kind(&kind);

            let state = page.state();
            if let Some(error) = state.error.clone() {
                return Err(CliError::Rejected(error));
            }
            println!("types: {}", state.types().join(", "));
            for vehicle in state.visible() {
                print_vehicle(vehicle);
            }
            Ok(())
        }
        VehiclesSubcommand::Show { id } => {
            enter(app, Route::VehicleDetails(id.clone()))?;
            let page = VehicleDetailsPage::new(app.scope(), &id)?;
            page.load().await;

            let state = page.state();
            let Some(vehicle) = &state.vehicle else {
                return Err(rejected(state.error));
            };
            print_vehicle(vehicle);
            if let Some(next) = page.book() {
                println!("book it: rentride book {id} --start <pickup> --end <return>  ({})", next.path);
            } else {
                println!("currently unavailable");
            }
            Ok(())
        }
    }
}

async fn run_book(app: &App, vehicle_id: &str, start: &str, end: &str) -> Result<(), CliError> {
    enter(app, Route::Book(vehicle_id.to_owned()))?;
    for input in [start, end] {
        if parse_local(input).is_none() {
            return Err(CliError::InvalidDateTime(input.to_owned()));
        }
    }

    let page = BookingPage::new(app.scope(), vehicle_id)?;
    page.load().await;
    let Some(vehicle) = page.state().vehicle else {
        return Err(CliError::Rejected("Vehicle not found".to_owned()));
    };
    page.set_start(start);
    page.set_end(end);

    let estimate = page.state().estimate();
    println!(
        "{}: {} day(s) x {} = {}",
        vehicle.name,
        estimate.days,
        format_money(vehicle.daily_rate),
        format_money(estimate.total)
    );
    match estimate.blocked() {
        Some(Blocked::NoDuration) => {
            return Err(CliError::Rejected("Return time must be after pickup time.".to_owned()));
        }
        Some(Blocked::NoCharge) => {
            return Err(CliError::Rejected("This vehicle has no daily rate and cannot be booked.".to_owned()));
        }
        None => {}
    }

    match page.submit().await {
        Some(next) => {
            println!("{}", next.state.message.unwrap_or_default());
            Ok(())
        }
        None => Err(rejected(page.state().error)),
    }
}

// =============================================================================
// ADMIN
// =============================================================================

async fn run_admin(app: &App, admin: AdminCommand) -> Result<(), CliError> {
    enter(app, Route::Admin)?;
    match admin.command {
        AdminSubcommand::Stats => {
            let dashboard = AdminDashboard::new(app.scope())?;
            dashboard.select_tab(AdminTab::Overview).await;
            let state = dashboard.state();
            if let Some(error) = state.error {
                return Err(CliError::Rejected(error));
            }
            for card in stat_cards(state.stats.as_ref()) {
                println!("{:<16}{}", card.label, card.value);
            }
            let activities = state.stats.and_then(|s| s.recent_activities).unwrap_or_default();
            for activity in activities {
                println!(
                    "{}  {}: {} booked {}",
                    display_date(&activity.created_at),
                    activity.kind,
                    activity.customer_name,
                    activity.vehicle_name
                );
            }
            Ok(())
        }
        AdminSubcommand::Vehicles(vehicles) => run_admin_vehicles(app, vehicles).await,
        AdminSubcommand::Users(users) => run_admin_users(app, users).await,
        AdminSubcommand::Bookings(bookings) => run_admin_bookings(app, bookings).await,
    }
}

async fn run_admin_vehicles(app: &App, vehicles: AdminVehiclesCommand) -> Result<(), CliError> {
    let page = ManageVehicles::new(app.scope())?;
    page.load().await;
    if let Some(error) = page.state().table.error {
        return Err(CliError::Rejected(error));
    }

    match vehicles.command {
        AdminVehiclesSubcommand::List { search } => {
            page.set_search(&search);
            for vehicle in page.state().visible() {
                print_vehicle(vehicle);
            }
            Ok(())
        }
        AdminVehiclesSubcommand::Create(fields) => {
            page.open_create();
            page.edit(|form| fields.apply(form));
            save_vehicle(&page).await
        }
        AdminVehiclesSubcommand::Update { id, fields } => {
            if !page.open_edit(&id) {
                return Err(CliError::Rejected(format!("vehicle {id} not found")));
            }
            page.edit(|form| fields.apply(form));
            save_vehicle(&page).await
        }
        AdminVehiclesSubcommand::Delete { id, yes } => {
            page.request_delete(&id);
            if !confirmed(rentride::pages::admin::vehicles::DELETE_PROMPT, yes)? {
                page.cancel();
                return Err(CliError::Aborted);
            }
            if !page.confirm().await {
                return Err(rejected(page.state().table.error));
            }
            println!("deleted vehicle {id}");
            Ok(())
        }
    }
}

async fn save_vehicle(page: &ManageVehicles) -> Result<(), CliError> {
    if !page.save().await {
        return Err(rejected(page.state().table.error));
    }
    println!("saved");
    Ok(())
}

impl VehicleFields {
    fn apply(self, form: &mut VehicleForm) {
        let Self { name, kind, registration, price, status } = self;
        if let Some(name) = name {
            form.vehicle_name = name;
        }
        if let Some(kind) = kind {
            form.kind = kind;
        }
        if let Some(registration) = registration {
            form.registration_number = registration;
        }
        if let Some(price) = price {
            form.daily_rent_price = price;
        }
        if let Some(status) = status {
            form.availability_status = status;
        }
    }
}

async fn run_admin_users(app: &App, command: AdminUsersCommand) -> Result<(), CliError> {
    let page = ManageUsers::new(app.scope())?;
    page.load().await;
    if let Some(error) = page.state().error {
        return Err(CliError::Rejected(error));
    }

    match command.command {
        AdminUsersSubcommand::List { search } => {
            page.set_search(&search);
            let state = page.state();
            for user in users::visible(&state) {
                let joined = user.created_at.as_deref().map(display_date).unwrap_or_default();
                println!("{}\t{}\t{}\t{}\t{}", user.id, user.name, user.email, user.role, joined);
            }
            Ok(())
        }
        AdminUsersSubcommand::ToggleRole { id, yes } => {
            if !page.request_role_toggle(&id) {
                return Err(CliError::Rejected(format!("user {id} not found")));
            }
            confirm_pending(&page, yes).await
        }
        AdminUsersSubcommand::Delete { id, yes } => {
            page.request_delete(&id);
            confirm_pending(&page, yes).await
        }
    }
}

async fn confirm_pending(page: &ManageUsers, yes: bool) -> Result<(), CliError> {
    let prompt = page.state().confirm.pending().map(users::UserAction::prompt).unwrap_or_default();
    if !confirmed(&prompt, yes)? {
        page.cancel();
        return Err(CliError::Aborted);
    }
    if !page.confirm().await {
        return Err(rejected(page.state().error));
    }
    println!("done");
    Ok(())
}

async fn run_admin_bookings(app: &App, command: AdminBookingsCommand) -> Result<(), CliError> {
    let page = ManageBookings::new(app.scope())?;
    page.load().await;
    if let Some(error) = page.state().error {
        return Err(CliError::Rejected(error));
    }

    let (id, status, yes) = match command.command {
        AdminBookingsSubcommand::List { search } => {
            page.set_search(&search);
            let state = page.state();
            for booking in bookings::visible(&state) {
                print_booking(booking);
            }
            return Ok(());
        }
        AdminBookingsSubcommand::Return { id, yes } => (id, BookingStatus::Returned, yes),
        AdminBookingsSubcommand::Cancel { id, yes } => (id, BookingStatus::Cancelled, yes),
    };

    page.request_status(&id, status).map_err(|e| CliError::Rejected(e.to_string()))?;
    let prompt = page.state().confirm.pending().map(bookings::SetStatus::prompt).unwrap_or_default();
    if !confirmed(&prompt, yes)? {
        page.cancel();
        return Err(CliError::Aborted);
    }
    if !page.confirm().await {
        return Err(rejected(page.state().error));
    }
    println!("booking {id} marked {status}");
    Ok(())
}

// =============================================================================
// OUTPUT / INPUT
// =============================================================================

fn print_vehicle(vehicle: &Vehicle) {
    println!(
        "{}\t{}\t{}\t{}\t{}/day\t{}",
        vehicle.id,
        vehicle.vehicle_name,
        vehicle.kind,
        vehicle.registration_number,
        format_money(vehicle.daily_rent_price),
        vehicle.availability_status
    );
}

fn print_booking(booking: &Booking) {
    let customer = booking.customer.as_ref().map_or("-", |c| c.name.as_str());
    let vehicle = booking.vehicle.as_ref().map_or("Vehicle", |v| v.vehicle_name.as_str());
    println!(
        "{}\t{}\t{}\t{} -> {}\t{}\t{}",
        booking.id,
        customer,
        vehicle,
        display_date(&booking.rent_start_date),
        display_date(&booking.rent_end_date),
        format_money(booking.total_price),
        booking.status
    );
}

fn prompt_line(prompt: &str) -> Result<String, CliError> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn confirmed(prompt: &str, yes: bool) -> Result<bool, CliError> {
    if yes {
        return Ok(true);
    }
    let answer = prompt_line(&format!("{prompt} [y/N] "))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
