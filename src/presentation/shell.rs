//! Line-oriented interactive shell.

use std::io;

use chrono::NaiveDate;
use futures_util::future::Either;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::app::AppContext;
use super::guard::GuardDecision;
use super::navigator::{Navigation, NavigationError, Navigator};
use super::pages;
use super::routes::Route;
use crate::domain::entities::{CartItem, CartState, MAX_QUANTITY};
use crate::domain::errors::RequestError;
use crate::domain::forms::RegisterForm;
use crate::domain::session::SessionState;
use crate::infrastructure::{LiveEvent, LiveHandle};

const HELP: &str = "\
Commands:
  help                              show this text
  quit                              leave the shell
  whoami                            show the signed-in user
  login <email> <password>          sign in
  logout                            sign out
  register <name> <last-name> <email> <password> <YYYY-MM-DD> <document> <phone>
  email <address>                   check whether an address is registered
  google-url                        print the Google sign-up link
  google <code>                     sign in with a Google authorization code
  go <path|name>                    open a page (home, dashboard, payment, profile, ...)
  station <id>                      show one station
  types                             list ticket types
  best                              show the recommended ticket
  cart open|close|show|clear        manage the cart
  cart add <ticket-type> [qty]      add 1 to 99 tickets to the cart
  cart remove <line>                remove a cart line by its id prefix
  live                              show live connection status";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    #[error("unknown command {0:?}, try help")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Open,
    Close,
    Show,
    Add { ticket_type_id: String, quantity: u32 },
    Remove(String),
    Clear,
}

/// Parsed shell input.
pub enum ShellCommand {
    Help,
    Quit,
    WhoAmI,
    Login { email: String, password: String },
    Logout,
    Register(Box<RegisterForm>),
    Email(String),
    GoogleUrl,
    Google(String),
    Go(String),
    Station(String),
    Types,
    Best,
    Cart(CartCommand),
    Live,
}

impl ShellCommand {
    /// Parses one input line. Blank lines yield `None`.
    ///
    /// # Errors
    /// Returns error for unknown commands and malformed arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.to_ascii_lowercase().as_str(), args) {
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            ("whoami", _) => Self::WhoAmI,
            ("login", [email, password]) => Self::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            ("login", _) => return Err(ShellError::Usage("login <email> <password>")),
            ("logout", _) => Self::Logout,
            ("register", [name, last_name, email, password, born, document, phone]) => {
                let date_of_birth = NaiveDate::parse_from_str(born, "%Y-%m-%d").map_err(|_| {
                    ShellError::InvalidArgument {
                        name: "date of birth",
                        value: (*born).to_string(),
                    }
                })?;
                Self::Register(Box::new(RegisterForm {
                    name: (*name).to_string(),
                    last_name: (*last_name).to_string(),
                    email: (*email).to_string(),
                    password: (*password).to_string(),
                    date_of_birth,
                    document_number: (*document).to_string(),
                    phone: (*phone).to_string(),
                }))
            }
            ("register", _) => {
                return Err(ShellError::Usage(
                    "register <name> <last-name> <email> <password> <YYYY-MM-DD> <document> <phone>",
                ));
            }
            ("email", [address]) => Self::Email((*address).to_string()),
            ("email", _) => return Err(ShellError::Usage("email <address>")),
            ("google-url", _) => Self::GoogleUrl,
            ("google", [code]) => Self::Google((*code).to_string()),
            ("google", _) => return Err(ShellError::Usage("google <code>")),
            ("go", [path]) => Self::Go((*path).to_string()),
            ("go", _) => return Err(ShellError::Usage("go <path|name>")),
            ("station", [id]) => Self::Station((*id).to_string()),
            ("station", _) => return Err(ShellError::Usage("station <id>")),
            ("types", _) => Self::Types,
            ("best", _) => Self::Best,
            ("cart", args) => Self::Cart(CartCommand::parse(args)?),
            ("live", _) => Self::Live,
            _ => return Err(ShellError::UnknownCommand(name.to_string())),
        };

        Ok(Some(command))
    }
}

impl CartCommand {
    fn parse(args: &[&str]) -> Result<Self, ShellError> {
        const USAGE: &str = "cart open|close|show|clear|add <ticket-type> [qty]|remove <line>";

        match args {
            [] | ["show"] => Ok(Self::Show),
            ["open"] => Ok(Self::Open),
            ["close"] => Ok(Self::Close),
            ["clear"] => Ok(Self::Clear),
            ["add", ticket_type_id] => Ok(Self::Add {
                ticket_type_id: (*ticket_type_id).to_string(),
                quantity: 1,
            }),
            ["add", ticket_type_id, quantity] => {
                let quantity = quantity
                    .parse::<u32>()
                    .ok()
                    .filter(|q| (1..=MAX_QUANTITY).contains(q))
                    .ok_or_else(|| ShellError::InvalidArgument {
                        name: "quantity",
                        value: (*quantity).to_string(),
                    })?;
                Ok(Self::Add {
                    ticket_type_id: (*ticket_type_id).to_string(),
                    quantity,
                })
            }
            ["remove", line] => Ok(Self::Remove((*line).to_string())),
            _ => Err(ShellError::Usage(USAGE)),
        }
    }
}

/// Interactive loop over a command reader and an output writer.
pub struct Shell<R, W> {
    ctx: AppContext,
    navigator: Navigator,
    lines: Lines<R>,
    out: W,
    session_rx: watch::Receiver<SessionState>,
    live: Option<LiveHandle>,
    /// Navigation settled while a page was loading, presented next.
    deferred: Option<Result<Navigation, NavigationError>>,
    rendered: bool,
    running: bool,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(ctx: AppContext, input: R, out: W) -> Self {
        let session_rx = ctx.session.subscribe();

        Self {
            ctx,
            navigator: Navigator::new(),
            lines: input.lines(),
            out,
            session_rx,
            live: None,
            deferred: None,
            rendered: false,
            running: true,
        }
    }

    /// Attaches a live connection whose events are printed as they arrive.
    #[must_use]
    pub fn with_live(mut self, handle: LiveHandle) -> Self {
        self.live = Some(handle);
        self
    }

    pub fn take_live(&mut self) -> Option<LiveHandle> {
        self.live.take()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until `quit` or end of input.
    ///
    /// # Errors
    /// Returns error if reading input or writing output fails.
    pub async fn run(&mut self) -> io::Result<()> {
        let state = self.session_rx.borrow_and_update().clone();
        let navigation = self.navigator.go(Route::Landing, &state);
        self.present(navigation).await?;

        while self.running {
            let live_event = match &mut self.live {
                Some(handle) => Either::Left(handle.next_event()),
                None => Either::Right(std::future::pending()),
            };

            tokio::select! {
                line = self.lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line).await?,
                    None => break,
                },

                Ok(()) = self.session_rx.changed() => {
                    self.on_session_change().await?;
                }

                event = live_event => self.on_live_event(event).await?,
            }

            while let Some(navigation) = self.deferred.take() {
                self.present(navigation).await?;
            }
        }

        debug!("Shell loop finished");
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> io::Result<()> {
        match ShellCommand::parse(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => Ok(()),
            Err(e) => self.say(&e.to_string()).await,
        }
    }

    async fn execute(&mut self, command: ShellCommand) -> io::Result<()> {
        match command {
            ShellCommand::Help => self.say(HELP).await,
            ShellCommand::Quit => {
                self.running = false;
                Ok(())
            }
            ShellCommand::WhoAmI => {
                let text = self.ctx.session.current_user().map_or_else(
                    || "Not signed in.".to_string(),
                    |user| format!("{} <{}>", user.display_name(), user.email()),
                );
                self.say(&text).await
            }
            ShellCommand::Login { email, password } => {
                match self.ctx.session.login(&email, &password).await {
                    Ok(user) => self.say(&format!("Signed in as {}.", user.display_name())).await,
                    Err(e) => self.report(&e).await,
                }
            }
            ShellCommand::Logout => match self.ctx.session.logout().await {
                Ok(()) => self.say("Signed out.").await,
                Err(e) => {
                    self.say("Signed out locally; the server did not confirm.").await?;
                    self.report(&e).await
                }
            },
            ShellCommand::Register(form) => match self.ctx.session.register(&form).await {
                Ok(()) => {
                    self.say("Account created. Check your email, then sign in.").await?;
                    self.navigate(Route::Login).await
                }
                Err(e) => self.report(&e).await,
            },
            ShellCommand::Email(address) => match self.ctx.session.email_available(&address).await
            {
                Ok(true) => self.say(&format!("{address} is available.")).await,
                Ok(false) => self.say(&format!("{address} is already registered.")).await,
                Err(e) => self.report(&e).await,
            },
            ShellCommand::GoogleUrl => match self.ctx.session.google_signup_url().await {
                Ok(url) => self.say(&url).await,
                Err(e) => self.report(&e).await,
            },
            ShellCommand::Google(code) => match self.ctx.session.google_login(&code).await {
                Ok(user) => self.say(&format!("Signed in as {}.", user.display_name())).await,
                Err(e) => self.report(&e).await,
            },
            ShellCommand::Go(path) => {
                let state = self.session_rx.borrow().clone();
                let navigation = self.navigator.go_path(&path, &state);
                self.present(navigation).await
            }
            ShellCommand::Station(id) => match self.ctx.catalog.station(&id).await {
                Ok(station) => {
                    let mut text = format!("[{}] {}", station.id, station.name);
                    if let Some(line) = &station.line {
                        text.push_str(&format!(" (line {line})"));
                    }
                    if let Some(address) = &station.address {
                        text.push_str(&format!("\n  {address}"));
                    }
                    self.say(&text).await
                }
                Err(e) => self.report(&e).await,
            },
            ShellCommand::Types => match self.ctx.catalog.ticket_types().await {
                Ok(types) if types.is_empty() => self.say("No ticket types on sale.").await,
                Ok(types) => {
                    let text = types
                        .iter()
                        .map(|ticket| format!("[{}] {}", ticket.id, ticket.summary()))
                        .collect::<Vec<_>>()
                        .join("\n");
                    self.say(&text).await
                }
                Err(e) => self.report(&e).await,
            },
            ShellCommand::Best => {
                let Some(user) = self.ctx.session.current_user() else {
                    return self.say("Sign in to get a recommendation.").await;
                };
                match self.ctx.catalog.best_ticket(user.email()).await {
                    Ok(ticket) => self.say(&format!("Recommended: {}", ticket.summary())).await,
                    Err(e) => self.report(&e).await,
                }
            }
            ShellCommand::Cart(command) => self.cart(command).await,
            ShellCommand::Live => {
                let text = match &self.live {
                    Some(handle) if handle.is_active() => "Live connection active.",
                    _ => "Live connection inactive.",
                };
                self.say(text).await
            }
        }
    }

    async fn cart(&mut self, command: CartCommand) -> io::Result<()> {
        let cart = self.ctx.cart.clone();

        match command {
            CartCommand::Open => {
                cart.open();
                self.say(&cart_listing(&cart.snapshot())).await
            }
            CartCommand::Close => {
                cart.close();
                self.say("Cart closed.").await
            }
            CartCommand::Show => self.say(&cart_listing(&cart.snapshot())).await,
            CartCommand::Clear => {
                cart.clear();
                self.say("Cart cleared.").await
            }
            CartCommand::Add {
                ticket_type_id,
                quantity,
            } => {
                let types = match self.ctx.catalog.ticket_types().await {
                    Ok(types) => types,
                    Err(e) => return self.report(&e).await,
                };
                let Some(ticket) = types.iter().find(|t| t.id == ticket_type_id) else {
                    return self
                        .say(&format!("No ticket type {ticket_type_id:?}, see types."))
                        .await;
                };

                match cart.add_item(CartItem::from_ticket(ticket, quantity)) {
                    Ok(id) => {
                        self.say(&format!("Added {} x{quantity} as {}.", ticket.name, id.short()))
                            .await
                    }
                    Err(e) => self.say(&e.to_string()).await,
                }
            }
            CartCommand::Remove(prefix) => {
                let found = cart.snapshot().find_by_prefix(&prefix).map(|item| item.id);
                match found.and_then(|id| cart.remove_item(id)) {
                    Some(item) => self.say(&format!("Removed {}.", item.name)).await,
                    None => self.say(&format!("No single cart line matches {prefix:?}.")).await,
                }
            }
        }
    }

    async fn on_session_change(&mut self) -> io::Result<()> {
        let state = self.session_rx.borrow_and_update().clone();
        debug!(
            authenticated = state.is_authenticated(),
            loading = state.is_loading,
            "Session changed"
        );

        let was_rendered = self.rendered;
        match self.navigator.refresh(&state) {
            Ok(navigation)
                if was_rendered
                    && !navigation.redirected()
                    && navigation.decision == GuardDecision::Render => Ok(()),
            navigation => self.present(navigation).await,
        }
    }

    async fn on_live_event(&mut self, event: Option<LiveEvent>) -> io::Result<()> {
        match event {
            Some(LiveEvent::Text(text)) => self.say(&format!("[live] {text}")).await,
            Some(LiveEvent::Binary(data)) => {
                self.say(&format!("[live] {} bytes", data.len())).await
            }
            Some(LiveEvent::Closed { code, reason }) => {
                info!(?code, %reason, "Live connection closed");
                self.live = None;
                self.say("[live] connection closed").await
            }
            None => {
                self.live = None;
                Ok(())
            }
        }
    }

    async fn navigate(&mut self, route: Route) -> io::Result<()> {
        let state = self.session_rx.borrow().clone();
        let navigation = self.navigator.go(route, &state);
        self.present(navigation).await
    }

    async fn present(
        &mut self,
        navigation: Result<Navigation, NavigationError>,
    ) -> io::Result<()> {
        let navigation = match navigation {
            Ok(navigation) => navigation,
            Err(e) => {
                warn!(error = %e, "Navigation failed");
                return self.say(&e.to_string()).await;
            }
        };

        for hop in &navigation.redirects {
            self.say(&format!("-> {}", hop.path())).await?;
        }

        self.rendered = navigation.decision == GuardDecision::Render;
        match navigation.decision {
            GuardDecision::Render => self.render(navigation.route).await,
            GuardDecision::Loading => self.say("Checking your session...").await,
            GuardDecision::AwaitingRedirect | GuardDecision::Redirect(_) => Ok(()),
        }
    }

    /// Loads a page while still following session changes. A change that
    /// moves the user elsewhere makes the load stale and is presented once
    /// the load returns.
    async fn render(&mut self, route: Route) -> io::Result<()> {
        let scope = self.navigator.scope();
        let result = {
            let load = pages::render(route, &self.ctx, &scope);
            tokio::pin!(load);

            loop {
                tokio::select! {
                    result = &mut load => break result,

                    Ok(()) = self.session_rx.changed() => {
                        let state = self.session_rx.borrow_and_update().clone();
                        let navigation = self.navigator.refresh(&state);
                        let unchanged = matches!(
                            &navigation,
                            Ok(n) if !n.redirected() && n.decision == GuardDecision::Render
                        );
                        if !unchanged {
                            self.deferred = Some(navigation);
                        }
                    }
                }
            }
        };

        match result {
            Ok(Some(page)) => self.say(&page).await,
            Ok(None) => Ok(()),
            Err(e) => self.report(&e).await,
        }
    }

    async fn report(&mut self, error: &RequestError) -> io::Result<()> {
        let mut text = format!("error: {error}");
        if let Some(fields) = error.field_errors() {
            for (field, messages) in fields {
                text.push_str(&format!("\n  {field}: {}", messages.join(", ")));
            }
        }
        self.say(&text).await
    }

    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await
    }
}

fn cart_listing(cart: &CartState) -> String {
    pages::cart_lines(cart).join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_test::assert_ok;

    use super::*;
    use crate::domain::entities::{Station, TicketType};
    use crate::domain::errors::FieldErrors;
    use crate::domain::ports::CatalogPort;
    use crate::domain::ports::mocks::{MockAuthPort, MockCatalogPort};
    use rust_decimal::Decimal;
    use test_case::test_case;

    #[test_case("" ; "blank")]
    #[test_case("   " ; "whitespace")]
    fn test_blank_line(line: &str) {
        assert!(ShellCommand::parse(line).unwrap().is_none());
    }

    #[test_case("login a@b.com" => ShellError::Usage("login <email> <password>") ; "login_missing_password")]
    #[test_case("fly home" => ShellError::UnknownCommand("fly".to_string()) ; "unknown")]
    #[test_case("go" => ShellError::Usage("go <path|name>") ; "go_without_target")]
    #[test_case("register a b c@d.com Aa1@2345 31-12-1990 ABC123 5551234" => ShellError::InvalidArgument { name: "date of birth", value: "31-12-1990".to_string() } ; "register_bad_date")]
    fn test_parse_errors(line: &str) -> ShellError {
        match ShellCommand::parse(line) {
            Err(e) => e,
            Ok(_) => panic!("{line:?} should not parse"),
        }
    }

    #[test]
    fn test_parse_login() {
        let command = ShellCommand::parse("LOGIN a@b.com Aa1@2345").unwrap();
        assert!(matches!(
            command,
            Some(ShellCommand::Login { email, password })
                if email == "a@b.com" && password == "Aa1@2345"
        ));
    }

    #[test]
    fn test_parse_register() {
        let command =
            ShellCommand::parse("register Ana Diaz ana@metro.test Aa1@2345 1990-05-01 ABC123 5551234")
                .unwrap();
        let Some(ShellCommand::Register(form)) = command else {
            panic!("expected register");
        };
        assert_eq!(form.last_name, "Diaz");
        assert_eq!(form.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
    }

    #[test_case(&[], Ok(CartCommand::Show) ; "bare")]
    #[test_case(&["open"], Ok(CartCommand::Open) ; "open")]
    #[test_case(&["add", "single"], Ok(CartCommand::Add { ticket_type_id: "single".to_string(), quantity: 1 }) ; "add_default_quantity")]
    #[test_case(&["add", "single", "3"], Ok(CartCommand::Add { ticket_type_id: "single".to_string(), quantity: 3 }) ; "add_quantity")]
    #[test_case(&["add", "single", "0"], Err(ShellError::InvalidArgument { name: "quantity", value: "0".to_string() }) ; "add_zero")]
    #[test_case(&["add", "single", "100"], Err(ShellError::InvalidArgument { name: "quantity", value: "100".to_string() }) ; "add_above_limit")]
    #[test_case(&["add", "single", "4294967295"], Err(ShellError::InvalidArgument { name: "quantity", value: "4294967295".to_string() }) ; "add_u32_max")]
    #[test_case(&["add", "single", "99"], Ok(CartCommand::Add { ticket_type_id: "single".to_string(), quantity: 99 }) ; "add_at_limit")]
    #[test_case(&["remove", "ab12"], Ok(CartCommand::Remove("ab12".to_string())) ; "remove")]
    #[test_case(&["empty"], Err(ShellError::Usage("cart open|close|show|clear|add <ticket-type> [qty]|remove <line>")) ; "unknown_subcommand")]
    fn test_cart_parse(args: &[&str], expected: Result<CartCommand, ShellError>) {
        assert_eq!(CartCommand::parse(args), expected);
    }

    fn context(backend_accepts: bool) -> AppContext {
        let mut catalog = MockCatalogPort::new();
        catalog.expect_stations().returning(|| Ok(Vec::new()));
        catalog.expect_ticket_types().returning(|| {
            Ok(vec![TicketType {
                id: "single".to_string(),
                name: "Single ride".to_string(),
                description: None,
                price: Decimal::new(150, 2),
                trips: Some(1),
                validity_days: None,
            }])
        });
        AppContext::new(Arc::new(MockAuthPort::new(backend_accepts)), Arc::new(catalog))
    }

    async fn run_script(ctx: AppContext, script: &str) -> String {
        let mut shell = Shell::new(ctx, script.as_bytes(), Vec::new());
        shell.run().await.unwrap();
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_protected_page_redirects_to_login() {
        let ctx = context(false);
        ctx.session.check_auth().await;

        let output = run_script(ctx, "go dashboard\nquit\n").await;

        assert!(output.contains("-> /auth/login"));
        assert!(output.contains("Sign in"));
    }

    #[tokio::test]
    async fn test_login_then_whoami() {
        let output = run_script(context(true), "login a@b.com Aa1@2345\nwhoami\nquit\n").await;

        assert!(output.contains("Signed in as"));
        assert!(output.contains("<a@b.com>"));
    }

    #[tokio::test]
    async fn test_cart_add_and_show() {
        let ctx = context(true);
        let cart = ctx.cart.clone();

        let output = run_script(ctx, "cart add single 2\ncart show\nquit\n").await;

        assert!(output.contains("Added Single ride x2"));
        assert!(output.contains("Total: $3.00"));
        assert_eq!(cart.snapshot().ticket_count(), 2);
    }

    #[tokio::test]
    async fn test_oversized_quantity_is_rejected_and_cart_still_renders() {
        let ctx = context(true);
        let cart = ctx.cart.clone();

        let output = run_script(
            ctx,
            "cart add single 4294967295\ncart add single 99\ncart add single 99\ncart show\nquit\n",
        )
        .await;

        assert!(output.contains("invalid quantity: \"4294967295\""));
        assert!(output.contains("Cart (198 tickets)"));
        assert!(output.contains("Total: $297.00"));
        assert_eq!(cart.snapshot().ticket_count(), 198);
    }

    struct SlowCatalog {
        delay: Duration,
    }

    #[async_trait]
    impl CatalogPort for SlowCatalog {
        async fn stations(&self) -> Result<Vec<Station>, RequestError> {
            Ok(Vec::new())
        }

        async fn station(&self, id: &str) -> Result<Station, RequestError> {
            Err(RequestError::from_status(404, format!("no station {id}"), FieldErrors::default()))
        }

        async fn ticket_types(&self) -> Result<Vec<TicketType>, RequestError> {
            tokio::time::sleep(self.delay).await;
            Ok(Vec::new())
        }

        async fn best_ticket(&self, _email: &str) -> Result<TicketType, RequestError> {
            Err(RequestError::from_status(404, "no recommendation", FieldErrors::default()))
        }
    }

    #[tokio::test]
    async fn test_sign_out_during_page_load_discards_the_page() {
        let ctx = AppContext::new(
            Arc::new(MockAuthPort::new(true)),
            Arc::new(SlowCatalog {
                delay: Duration::from_millis(300),
            }),
        );
        assert_ok!(ctx.session.login("a@b.com", "Aa1@2345").await);

        let session = ctx.session.clone();
        let expire = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            session.handle_request_error(&RequestError::Auth {
                status: 401,
                message: "expired".to_string(),
            });
        });

        let output = run_script(ctx, "go dashboard\nquit\n").await;
        expire.await.unwrap();

        assert!(output.contains("-> /auth/login"));
        assert!(output.contains("Sign in"));
        assert!(!output.contains("Welcome back"));
    }

    #[tokio::test]
    async fn test_unknown_ticket_type_leaves_cart_empty() {
        let ctx = context(true);
        let cart = ctx.cart.clone();

        let output = run_script(ctx, "cart add monthly\nquit\n").await;

        assert!(output.contains("No ticket type \"monthly\""));
        assert!(cart.snapshot().is_empty());
    }
}
