//! Command-line front end.
//!
//! # Responsibility
//! - Wire environment configuration, logging, storage and the registry.
//! - Render core view models as plain text.
//!
//! # Invariants
//! - Every card printed in one tick derives from that tick's instant.
//! - Registry and settings edits are saved before the command returns.

use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;
use worldclock_core::catalog;
use worldclock_core::config::{load_settings, save_settings};
use worldclock_core::export::calendar::{
    build_event, google_calendar_url, ics_file_name, outlook_calendar_url, to_ics, MeetingRequest,
};
use worldclock_core::export::embed::{default_params, iframe_snippet, script_snippet, widget_url};
use worldclock_core::export::table::{export_file_name, export_rows, to_csv, to_json, ExportFormat};
use worldclock_core::service::alert_scheduler::AlertScheduler;
use worldclock_core::service::converter::Converter;
use worldclock_core::service::notifier::{DesktopNotifier, NotificationPermission, NotifierError};
use worldclock_core::service::offline_cache::OfflineCache;
use worldclock_core::service::weather::{
    MockWeatherProvider, WeatherIcon, WeatherProvider, WeatherSlot, WeatherState,
};
use worldclock_core::time::travel::{parse_date, parse_hh_mm};
use worldclock_core::view::card::{build_card, LocationCardView};
use worldclock_core::view::widget::{render, WidgetParams, WidgetView};
use worldclock_core::{
    core_version, init_logging, open_db, open_db_in_memory, AppConfig, Clock, LocationRegistry,
    LoggingConfig, NotificationCenter, Settings, SqliteKvStore, SqliteLocationRepository,
    SystemClock, Theme, Ticker, ZoneId,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

const DEFAULT_EMBED_ORIGIN: &str = "http://localhost:8080";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("worldclock {}", core_version());
    println!(
        r#"
Usage:
  worldclock show [--at RFC3339]
  worldclock watch [--ticks N] [--offline]
  worldclock convert FROM TO [--at RFC3339 | --local YYYY-MM-DD HH:MM]
  worldclock search QUERY
  worldclock add CITY
  worldclock remove N | up N | down N | favorite N
  worldclock rename N [NAME]
  worldclock widget QUERY
  worldclock embed [ORIGIN]
  worldclock export csv|json [--at RFC3339] [--save]
  worldclock calendar TITLE YYYY-MM-DD HH:MM ZONE_OR_CITY [--attendees LIST]
  worldclock alert LOCATION HH:MM MESSAGE
  worldclock alerts [toggle N | delete N]
  worldclock notifications [read-all | clear]
  worldclock settings [format 12|24] [theme light|dark] [weather on|off]
  worldclock version

Environment:
  WORLDCLOCK_DB, WORLDCLOCK_LOG_LEVEL, WORLDCLOCK_LOG_DIR,
  WORLDCLOCK_HOST_TZ, WORLDCLOCK_FORMAT, WORLDCLOCK_THEME"#
    );
}

fn run(args: &[String]) -> CliResult<()> {
    let Some((command, rest)) = args.split_first() else {
        print_usage();
        return Ok(());
    };
    match command.as_str() {
        "version" | "-v" | "--version" => {
            println!("worldclock {}", core_version());
            return Ok(());
        }
        "help" | "-h" | "--help" => {
            print_usage();
            return Ok(());
        }
        _ => {}
    }

    let config = AppConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&LoggingConfig::new(config.log_level.clone(), log_dir.clone()))?;
    }

    let conn = match &config.db_path {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteKvStore::new(&conn);
    let repo = SqliteLocationRepository::new(&conn);
    let mut app = App::open(store, repo, config)?;

    let result = app.dispatch(command, rest);
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command}"),
        Err(err) => warn!("event=cli_command module=cli status=error command={command} error={err}"),
    }
    result
}

/// Prints desktop notifications to stderr.
struct TerminalNotifier;

impl DesktopNotifier for TerminalNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    fn notify(&self, title: &str, body: &str, _icon: &str) -> Result<(), NotifierError> {
        eprintln!("[notification] {title}: {body}");
        Ok(())
    }
}

struct App<'conn> {
    config: AppConfig,
    store: SqliteKvStore<'conn>,
    repo: SqliteLocationRepository<'conn>,
    registry: LocationRegistry,
    settings: Settings,
}

impl<'conn> App<'conn> {
    /// Restores the registry, seeding the default cities when it is empty.
    fn open(
        store: SqliteKvStore<'conn>,
        repo: SqliteLocationRepository<'conn>,
        config: AppConfig,
    ) -> CliResult<Self> {
        let mut registry = LocationRegistry::restore(&repo)?;
        if registry.is_empty() {
            registry = LocationRegistry::with_defaults();
            registry.save(&repo)?;
        }
        let settings = config.effective_settings(load_settings(&store));
        Ok(Self {
            config,
            store,
            repo,
            registry,
            settings,
        })
    }

    fn dispatch(&mut self, command: &str, args: &[String]) -> CliResult<()> {
        match command {
            "show" => self.show(args),
            "watch" => self.watch(args),
            "convert" => self.convert(args),
            "search" => search(args),
            "add" => self.add(args),
            "remove" | "up" | "down" | "favorite" => self.edit(command, args),
            "rename" => self.rename(args),
            "widget" => widget(args),
            "embed" => self.embed(args),
            "export" => self.export(args),
            "calendar" => self.calendar(args),
            "alert" => self.add_alert(args),
            "alerts" => self.alerts(args),
            "notifications" => self.notifications(args),
            "settings" => self.update_settings(args),
            other => Err(format!("unknown command `{other}`; run `worldclock help`").into()),
        }
    }

    fn show(&self, args: &[String]) -> CliResult<()> {
        let now = instant_option(args)?.unwrap_or_else(|| SystemClock.now());
        let mut cards = self.cards(|_| now);
        if self.settings.show_weather {
            attach_weather(&mut cards);
        }
        print_cards(&cards, now);

        let mut cache = OfflineCache::open(&self.store);
        cache.cache_times(self.registry.locations(), now);
        Ok(())
    }

    fn watch(&self, args: &[String]) -> CliResult<()> {
        let ticks = match option_value(args, "--ticks") {
            Some(value) => Some(
                value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid --ticks `{value}`"))?,
            ),
            None => None,
        };
        let offline = has_flag(args, "--offline");

        let mut ticker = Ticker::new(SystemClock);
        let mut cache = OfflineCache::open(&self.store);
        cache.set_online(!offline);
        if cache.is_online() {
            cache.cache_times(self.registry.locations(), ticker.tick());
        }
        let mut center = NotificationCenter::open(&self.store).with_notifier(TerminalNotifier);
        let mut scheduler = AlertScheduler::open(&self.store);

        let mut tick = 0_u64;
        loop {
            let now = ticker.tick();
            scheduler.evaluate(now, &mut center);
            center.sync();

            let cards = self.cards(|location| cache.resolve_instant(location, now));
            print_cards(&cards, now);
            println!(
                "unread notifications: {}{}",
                center.unread_count(),
                if cache.is_online() { "" } else { "  (offline)" }
            );
            println!();

            tick += 1;
            if ticks.is_some_and(|limit| tick >= limit) {
                return Ok(());
            }
            thread::sleep(Ticker::<SystemClock>::interval());
        }
    }

    fn convert(&self, args: &[String]) -> CliResult<()> {
        let [from, to, ..] = args else {
            return Err("usage: worldclock convert FROM TO".into());
        };
        let converter = Converter::new(self.settings.use_24_hour);
        let conversion = match option_values(args, "--local", 2) {
            Some([date, time]) => {
                converter.convert_local(parse_date(date)?, parse_hh_mm(time)?, from, to)?
            }
            _ => {
                let now = instant_option(args)?.unwrap_or_else(|| SystemClock.now());
                converter.convert(now, from, to)
            }
        };
        println!(
            "{:<16} {:>9}  {}",
            conversion.from.city, conversion.from.time_string, conversion.from.date_string
        );
        println!(
            "{:<16} {:>9}  {}  ({})",
            conversion.to.city,
            conversion.to.time_string,
            conversion.to.date_string,
            conversion.offset_label
        );
        Ok(())
    }

    fn add(&mut self, args: &[String]) -> CliResult<()> {
        let city = args.join(" ");
        if self.registry.add(&city).is_none() {
            return Err(format!("unknown city `{city}`; try `worldclock search`").into());
        }
        self.registry.save(&self.repo)?;
        println!("added {city}");
        Ok(())
    }

    fn edit(&mut self, command: &str, args: &[String]) -> CliResult<()> {
        let index = position_arg(args.first(), self.registry.len())?;
        match command {
            "remove" => {
                if let Some(removed) = self.registry.remove(index) {
                    println!("removed {}", removed.display_name());
                }
            }
            "up" => self.registry.move_up(index),
            "down" => self.registry.move_down(index),
            _ => self.registry.toggle_favorite(index),
        }
        self.registry.save(&self.repo)?;
        Ok(())
    }

    fn rename(&mut self, args: &[String]) -> CliResult<()> {
        let index = position_arg(args.first(), self.registry.len())?;
        let name = args.get(1..).map(|words| words.join(" ")).unwrap_or_default();
        self.registry.rename(index, &name);
        self.registry.save(&self.repo)?;
        Ok(())
    }

    fn embed(&self, args: &[String]) -> CliResult<()> {
        let origin = args.first().map_or(DEFAULT_EMBED_ORIGIN, String::as_str);
        let params = default_params(
            self.registry.locations(),
            WidgetParams {
                theme: self.settings.theme,
                use_24_hour: self.settings.use_24_hour,
                zones: Vec::new(),
                weather: self.settings.show_weather,
            },
        );
        let url = widget_url(origin, &params)?;
        println!("{url}\n\n{}\n\n{}", iframe_snippet(&url), script_snippet(&url));
        Ok(())
    }

    fn export(&self, args: &[String]) -> CliResult<()> {
        let format = ExportFormat::parse(args.first().map_or("", String::as_str))?;
        let now = instant_option(args)?.unwrap_or_else(|| SystemClock.now());
        let use_24_hour = self.settings.use_24_hour;
        let rows = export_rows(self.registry.locations(), now, use_24_hour, &self.config.host_zone);
        let body = match format {
            ExportFormat::Csv => to_csv(&rows),
            ExportFormat::Json => to_json(&rows, now, use_24_hour)?,
        };

        if has_flag(args, "--save") {
            let file_name = export_file_name(format, now);
            std::fs::write(&file_name, body)?;
            println!("wrote {file_name}");
        } else {
            println!("{body}");
        }
        Ok(())
    }

    fn calendar(&self, args: &[String]) -> CliResult<()> {
        let [title, date, time, zone, ..] = args else {
            return Err("usage: worldclock calendar TITLE YYYY-MM-DD HH:MM ZONE_OR_CITY".into());
        };
        let zone = match catalog::lookup(zone) {
            Some(city) => city.zone()?,
            None => ZoneId::parse(zone)?,
        };
        let mut request = MeetingRequest::start_from_local(
            title.as_str(),
            parse_date(date)?,
            parse_hh_mm(time)?,
            zone,
        )?;
        if let Some(attendees) = option_value(args, "--attendees") {
            request = request.with_attendees(attendees.as_str());
        }

        let event = build_event(&request, self.registry.locations())?;
        let file_name = ics_file_name(&event.title);
        std::fs::write(&file_name, to_ics(&event, Uuid::new_v4(), SystemClock.now()))?;

        println!("Google:  {}", google_calendar_url(&event)?);
        println!("Outlook: {}", outlook_calendar_url(&event)?);
        println!("wrote {file_name}");
        Ok(())
    }

    fn add_alert(&self, args: &[String]) -> CliResult<()> {
        let [location, time, message @ ..] = args else {
            return Err("usage: worldclock alert LOCATION HH:MM MESSAGE".into());
        };
        let mut scheduler = AlertScheduler::open(&self.store);
        let target = parse_hh_mm(time)?;
        if scheduler
            .add_rule(&self.registry, location, target, message.join(" "))
            .is_none()
        {
            return Err(format!("`{location}` is not in the registry").into());
        }
        println!("alert set for {location} at {}", target.format("%H:%M"));
        Ok(())
    }

    fn alerts(&self, args: &[String]) -> CliResult<()> {
        let mut scheduler = AlertScheduler::open(&self.store);
        if let Some(action) = args.first() {
            let index = position_arg(args.get(1), scheduler.rules().len())?;
            let id = scheduler.rules()[index].id;
            match action.as_str() {
                "toggle" => scheduler.toggle(id),
                "delete" => scheduler.delete(id),
                other => return Err(format!("unknown alerts action `{other}`").into()),
            };
        }
        for (index, rule) in scheduler.rules().iter().enumerate() {
            println!(
                "{:>2}. [{}] {} {} {}",
                index + 1,
                if rule.enabled { "on " } else { "off" },
                rule.target_time.format("%H:%M"),
                rule.location,
                rule.message
            );
        }
        Ok(())
    }

    fn notifications(&self, args: &[String]) -> CliResult<()> {
        let mut center = NotificationCenter::open(&self.store);
        match args.first().map(String::as_str) {
            Some("read-all") => center.mark_all_read(),
            Some("clear") => center.clear_all(),
            Some(other) => return Err(format!("unknown notifications action `{other}`").into()),
            None => {}
        }
        println!("{} unread", center.unread_count());
        for record in center.records() {
            println!(
                "{} {} [{}] {}: {}",
                if record.read { " " } else { "*" },
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.kind.as_str(),
                record.title,
                record.description
            );
        }
        Ok(())
    }

    fn update_settings(&mut self, args: &[String]) -> CliResult<()> {
        let mut stored = load_settings(&self.store);
        for pair in args.chunks(2) {
            match pair {
                [key, value] if key == "format" => {
                    stored.use_24_hour = match value.as_str() {
                        "24" => true,
                        "12" => false,
                        _ => return Err(format!("unsupported format `{value}`").into()),
                    };
                }
                [key, value] if key == "theme" => {
                    stored.theme = Theme::parse(value)
                        .ok_or_else(|| format!("unsupported theme `{value}`"))?;
                }
                [key, value] if key == "weather" => stored.show_weather = value == "on",
                _ => return Err(format!("unknown setting `{}`", pair.join(" ")).into()),
            }
        }
        save_settings(&self.store, &stored)?;
        self.settings = self.config.effective_settings(stored);
        println!(
            "format={} theme={} weather={}",
            self.settings.format_label(),
            self.settings.theme,
            if self.settings.show_weather { "on" } else { "off" }
        );
        Ok(())
    }

    fn cards(&self, instant_for: impl Fn(&str) -> DateTime<Utc>) -> Vec<LocationCardView> {
        let locations = self.registry.locations();
        locations
            .iter()
            .enumerate()
            .map(|(index, location)| {
                let instant = instant_for(&location.name);
                build_card(location, index, locations.len(), instant, &self.settings)
            })
            .collect()
    }
}

fn search(args: &[String]) -> CliResult<()> {
    for city in catalog::search(&args.join(" ")) {
        println!("{:<20} {:<20} {}", city.city, city.country, city.timezone);
    }
    Ok(())
}

fn widget(args: &[String]) -> CliResult<()> {
    let query = args.first().map_or("", String::as_str);
    let params = WidgetParams::from_query(query.split_once('?').map_or(query, |(_, q)| q));
    match render(&params, SystemClock.now()) {
        WidgetView::Empty { title, message, .. } => println!("{title}\n{message}"),
        WidgetView::Grid {
            title,
            header,
            cards,
            ..
        } => {
            println!("{title}\n{header}\n");
            for card in cards {
                println!(
                    "{:<16} {:>9}  {}  {:>3}%",
                    card.label, card.time_string, card.date_string, card.progress_percent
                );
            }
        }
    }
    Ok(())
}

fn attach_weather(cards: &mut [LocationCardView]) {
    let provider: Arc<dyn WeatherProvider + Send + Sync> = Arc::new(MockWeatherProvider::default());
    let mut slots: Vec<WeatherSlot> = cards
        .iter()
        .map(|card| WeatherSlot::request(Arc::clone(&provider), &card.original_name, true))
        .collect();
    for (card, slot) in cards.iter_mut().zip(slots.iter_mut()) {
        card.weather = Some(slot.wait().clone());
    }
}

fn print_cards(cards: &[LocationCardView], now: DateTime<Utc>) {
    println!("{}", now.format("%Y-%m-%d %H:%M:%S UTC"));
    for card in cards {
        let weather = match &card.weather {
            Some(WeatherState::Ready(report)) => format!(
                "  {} {}°C {}",
                WeatherIcon::classify(&report.description).as_str(),
                report.temperature_c,
                report.description
            ),
            Some(WeatherState::Unavailable(_)) => "  weather unavailable".to_string(),
            _ => String::new(),
        };
        println!(
            "{} {:<16} {:>9}  {:<11} {:>3.0}%  {:<7} {}{}",
            if card.is_favorite { "*" } else { " " },
            card.display_name,
            card.time.time_string,
            card.time.date_string,
            card.time.day_progress_percent,
            card.time.sky.as_str(),
            card.zone,
            weather
        );
    }
}

fn instant_option(args: &[String]) -> CliResult<Option<DateTime<Utc>>> {
    match option_value(args, "--at") {
        Some(value) => Ok(Some(
            DateTime::parse_from_rfc3339(value)
                .map_err(|err| format!("invalid --at `{value}`: {err}"))?
                .with_timezone(&Utc),
        )),
        None => Ok(None),
    }
}

fn option_value<'a>(args: &'a [String], name: &str) -> Option<&'a String> {
    option_values(args, name, 1).and_then(|values| values.first())
}

fn option_values<'a>(args: &'a [String], name: &str, count: usize) -> Option<&'a [String]> {
    let start = args.iter().position(|arg| arg == name)? + 1;
    args.get(start..start + count)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

/// Parses a 1-based position into an index below `len`.
fn position_arg(value: Option<&String>, len: usize) -> CliResult<usize> {
    let value = value.ok_or("missing position")?;
    match value.parse::<usize>() {
        Ok(position) if (1..=len).contains(&position) => Ok(position - 1),
        _ => Err(format!("position `{value}` is out of range 1..={len}").into()),
    }
}
