//! Terminal front-end for the Malmoon therapist pages.

use std::env;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

use malmoon_client::domain::character::Character;
use malmoon_client::domain::client::ClientSummary;
use malmoon_client::domain::feedback::parse_calendar_day;
use malmoon_client::domain::member::{AuthenticatedUser, MemberProfile};
use malmoon_client::domain::types::ClientId;
use malmoon_client::dto::chat::{ChatLine, MessageDirection};
use malmoon_client::dto::feedback::CalendarView;
use malmoon_client::forms::member::{
    AddressForm, CareerForm, CareerYearsForm, CharacterForm, PasswordForm, PhoneForm,
    sanitize_phone_input,
};
use malmoon_client::models::config::ClientConfig;
use malmoon_client::repository::{HttpRepository, ScheduleReader};
use malmoon_client::services::chat::{ChatPanel, ChatPanelState};
use malmoon_client::services::feedback::FeedbackCalendar;
use malmoon_client::services::{ServiceError, ServiceResult, member, roster};

#[derive(Parser)]
#[command(name = "malmoon")]
#[command(about = "Therapist tools for the Malmoon speech-therapy platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List assigned clients with their characters
    Roster,
    /// Show the feedback calendar of a child
    Feedback {
        #[arg(long)]
        child: i64,
        /// Day to open, `YYYY-MM-DD`
        #[arg(long)]
        date: Option<String>,
    },
    /// Chat with a client; type a line to send it, EOF to leave
    Chat {
        #[arg(long)]
        client: i64,
    },
    /// Show or edit your own profile
    Me {
        #[command(subcommand)]
        action: Option<MeAction>,
    },
}

#[derive(Subcommand)]
enum MeAction {
    Character {
        id: i64,
    },
    Phone {
        tel1: String,
        tel2: Option<String>,
    },
    Address {
        city: String,
        district: String,
        dong: String,
        detail: Option<String>,
    },
    Password {
        current: String,
        new: String,
        confirm: String,
    },
    CareerYears {
        years: i32,
    },
    AddCareer {
        company: String,
        position: String,
        start_date: String,
        end_date: Option<String>,
    },
    EditCareer {
        index: usize,
        company: String,
        position: String,
        start_date: String,
        end_date: Option<String>,
    },
    DeleteCareer {
        index: usize,
    },
}

async fn find_client(repo: &HttpRepository, client_id: i64) -> ServiceResult<ClientSummary> {
    let client_id = ClientId::new(client_id)?;
    repo.list_therapist_clients()
        .await?
        .into_iter()
        .find(|client| client.client_id == client_id)
        .ok_or(ServiceError::NotFound)
}

async fn show_roster(repo: &HttpRepository, user: &AuthenticatedUser) -> ServiceResult<()> {
    let page = roster::load_roster(repo, user).await?;

    println!("Pending requests: {}", page.pending_requests);
    if page.is_empty() {
        println!("No clients assigned yet.");
        return Ok(());
    }

    for entry in &page.entries {
        let summary = &entry.summary;
        let age = summary.age.map(|age| age.to_string()).unwrap_or_default();
        print!(
            "#{:<5} {:<12} {:<4} {:<8}",
            summary.client_id,
            summary.name,
            age,
            entry.character.name()
        );
        match page.details.get(&summary.client_id) {
            Some(detail) => println!(" {} | {}", detail.contact(), detail.address()),
            None => println!(" {}", summary.telephone.as_deref().unwrap_or("-")),
        }
    }
    Ok(())
}

fn print_month(calendar: &FeedbackCalendar, anchor: NaiveDate) {
    println!("{}", anchor.format("%B %Y"));
    let mut day = anchor.with_day(1).unwrap_or(anchor);
    while day.month() == anchor.month() {
        let marker = if calendar.tile(day, CalendarView::Month).marker {
            "*"
        } else {
            " "
        };
        print!("{:>3}{marker}", day.day());
        if day.weekday().number_from_monday() == 7 {
            println!();
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    println!();
}

async fn show_feedback(repo: &HttpRepository, child: i64, date: Option<String>) -> ServiceResult<()> {
    let client = find_client(repo, child).await?;
    let today = Local::now().date_naive();

    let mut calendar = FeedbackCalendar::new();
    calendar.open(repo, &client, today).await?;

    let selected = match date.as_deref() {
        Some(raw) => parse_calendar_day(raw)
            .ok_or_else(|| ServiceError::Form(format!("invalid date {raw:?}")))?,
        None => today,
    };
    println!("Feedback calendar of {}", client.name);
    print_month(&calendar, selected);
    let days: Vec<String> = calendar.dates().iter().map(NaiveDate::to_string).collect();
    if !days.is_empty() {
        println!("Feedback days: {}", days.join(", "));
    }

    if date.is_none() {
        return Ok(());
    }
    if !calendar.select_date(repo, selected).await? {
        println!("No feedback on {selected}.");
        return Ok(());
    }
    if let Some(content) = calendar.content() {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        println!("Storybook:       {}", field(&content.storybook_title));
        if let Some(accuracy) = content.accuracy {
            println!("Accuracy:        {accuracy:.1}%");
        }
        println!("Evaluation:      {}", field(&content.evaluation));
        println!("Strengths:       {}", field(&content.strengths));
        println!("Improvements:    {}", field(&content.improvements));
        println!("Recommendations: {}", field(&content.recommendations));
    }
    Ok(())
}

fn print_lines(lines: &[ChatLine], skip: usize) {
    for line in lines.iter().skip(skip) {
        let arrow = match line.direction {
            MessageDirection::Sent => ">",
            MessageDirection::Received => "<",
        };
        match line.sent_at {
            Some(at) => println!("{arrow} [{}] {}", at.format("%H:%M"), line.content),
            None => println!("{arrow} {}", line.content),
        }
    }
}

async fn run_chat(
    repo: HttpRepository,
    user: AuthenticatedUser,
    config: &ClientConfig,
    client_id: i64,
) -> ServiceResult<()> {
    let client = find_client(&repo, client_id).await?;
    let mut panel = ChatPanel::new(Arc::new(repo), user, config.poll_interval());
    let mut updates = panel.subscribe();
    panel.open(&client).await?;
    println!("Chatting with {}. Ctrl-D to leave.", client.name);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if let ChatPanelState::Failed(reason) = state {
                    log::error!("Chat closed: {reason}");
                    break;
                }
                let lines = panel.transcript();
                if lines.len() < shown {
                    shown = 0;
                }
                print_lines(&lines, shown);
                shown = lines.len();
            }
            line = stdin.next_line() => {
                match line {
                    Ok(Some(text)) => {
                        if let Err(err) = panel.send(&text).await {
                            log::error!("Message not sent: {err}");
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        log::error!("Failed to read input: {err}");
                        break;
                    }
                }
            }
        }
    }

    panel.close();
    Ok(())
}

fn print_profile(profile: &MemberProfile) {
    let character = Character::from(profile.character);
    println!("{} ({})", profile.name, profile.nickname);
    let theme = character.theme();
    println!(
        "Character:    {} [{}] background {} button {}/{}",
        character.name(),
        character.asset(),
        theme.background,
        theme.primary_bg,
        theme.primary_text
    );
    println!("Email:        {}", profile.email);
    println!("Phone:        {} / {}", profile.tel1, profile.tel2);
    println!(
        "Address:      {} {} {} {}",
        profile.city, profile.district, profile.dong, profile.detail
    );
    println!("Career years: {}", profile.career_years);
    for (index, career) in profile.careers.iter().enumerate() {
        let start = career.start_date.map(|d| d.to_string()).unwrap_or_default();
        let end = career
            .end_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "present".to_string());
        println!(
            "  [{index}] {} - {} ({start} ~ {end})",
            career.company, career.position
        );
    }
}

async fn run_me(repo: &HttpRepository, action: Option<MeAction>) -> ServiceResult<()> {
    let Some(action) = action else {
        let profile = member::load_my_info(repo).await?;
        print_profile(&profile);
        return Ok(());
    };

    match action {
        MeAction::Character { id } => {
            member::change_character(repo, CharacterForm { profile: id }).await?;
        }
        MeAction::Phone { tel1, tel2 } => {
            let form = PhoneForm {
                tel1: sanitize_phone_input(&tel1),
                tel2: tel2.as_deref().map(sanitize_phone_input),
            };
            member::update_phone(repo, form).await?;
        }
        MeAction::Address {
            city,
            district,
            dong,
            detail,
        } => {
            let form = AddressForm {
                city,
                district,
                dong,
                detail,
            };
            member::update_address(repo, form).await?;
        }
        MeAction::Password {
            current,
            new,
            confirm,
        } => {
            let form = PasswordForm {
                current_password: current,
                new_password: new,
                new_password_confirm: confirm,
            };
            member::change_password(repo, form).await?;
        }
        MeAction::CareerYears { years } => {
            member::update_career_years(repo, CareerYearsForm { career_years: years }).await?;
        }
        MeAction::AddCareer {
            company,
            position,
            start_date,
            end_date,
        } => {
            let mut profile = member::load_my_info(repo).await?;
            let form = CareerForm {
                company,
                position,
                start_date,
                end_date,
            };
            member::add_career(repo, &mut profile, form).await?;
        }
        MeAction::EditCareer {
            index,
            company,
            position,
            start_date,
            end_date,
        } => {
            let mut profile = member::load_my_info(repo).await?;
            let form = CareerForm {
                company,
                position,
                start_date,
                end_date,
            };
            member::save_career(repo, &mut profile, index, form).await?;
        }
        MeAction::DeleteCareer { index } => {
            let mut profile = member::load_my_info(repo).await?;
            member::delete_career(repo, &mut profile, index).await?;
        }
    }
    println!("Saved.");
    Ok(())
}

async fn run(cli: Cli, config: ClientConfig) -> ServiceResult<()> {
    let repo = HttpRepository::new(
        &config.api_base_url,
        &config.access_token,
        config.request_timeout(),
    )?;
    let user = config.authenticated_user();

    match cli.command {
        Commands::Roster => show_roster(&repo, &user).await,
        Commands::Feedback { child, date } => show_feedback(&repo, child, date).await,
        Commands::Chat { client } => run_chat(repo, user, &config, client).await,
        Commands::Me { action } => run_me(&repo, action).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let config = match ClientConfig::from_sources(Path::new("."), &app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli, config).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
