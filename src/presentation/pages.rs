//! Plain-text page shells.

use rust_decimal::Decimal;
use tracing::debug;

use super::app::AppContext;
use super::navigator::ViewScope;
use super::routes::Route;
use crate::domain::entities::{CartState, User};
use crate::domain::errors::RequestError;

/// Renders a page, or `None` when the user left before it finished loading.
///
/// A stale load is discarded whether it succeeded or failed.
///
/// # Errors
/// Returns the first backend error a page load hits.
pub async fn render(
    route: Route,
    ctx: &AppContext,
    scope: &ViewScope,
) -> Result<Option<String>, RequestError> {
    let lines = match route {
        Route::Landing => landing(ctx).await,
        Route::Dashboard => dashboard(ctx).await,
        Route::Payment => Ok(cart_lines(&ctx.cart.snapshot())),
        Route::Profile => Ok(profile(ctx.session.current_user().as_ref())),
        Route::Invoices => Ok(vec![
            "Invoices".to_string(),
            "  Invoice history is not available yet.".to_string(),
        ]),
        Route::Activation => Ok(vec![
            "Activate your card".to_string(),
            "  Present your metro card at a station kiosk to link it to this account.".to_string(),
        ]),
        Route::Login => Ok(vec![
            "Sign in".to_string(),
            "  login <email> <password>".to_string(),
            "  google-url, then google <code> to use a Google account".to_string(),
        ]),
        Route::Register => Ok(vec![
            "Create an account".to_string(),
            "  register <name> <last-name> <email> <password> <YYYY-MM-DD> <document> <phone>"
                .to_string(),
            "  email <address> checks whether an address is already registered".to_string(),
        ]),
    };

    if !scope.is_current() {
        debug!(route = %route, failed = lines.is_err(), "Discarding stale page load");
        return Ok(None);
    }

    lines.map(|lines| Some(lines.join("\n")))
}

async fn landing(ctx: &AppContext) -> Result<Vec<String>, RequestError> {
    let stations = ctx.catalog.stations().await?;

    let mut lines = vec![format!("Stations ({})", stations.len())];
    lines.extend(stations.iter().map(|station| match &station.line {
        Some(line) => format!("  [{}] {} (line {line})", station.id, station.name),
        None => format!("  [{}] {}", station.id, station.name),
    }));
    Ok(lines)
}

async fn dashboard(ctx: &AppContext) -> Result<Vec<String>, RequestError> {
    let Some(user) = ctx.session.current_user() else {
        return Ok(vec!["Dashboard".to_string()]);
    };

    let types = ctx.catalog.ticket_types().await?;
    let best = match ctx.catalog.best_ticket(user.email()).await {
        Ok(ticket) => Some(ticket),
        Err(e) if e.status() == Some(404) => None,
        Err(e) => return Err(e),
    };

    let mut lines = vec![format!("Welcome back, {}", user.display_name())];
    lines.push("Ticket types".to_string());
    lines.extend(
        types
            .iter()
            .map(|ticket| format!("  [{}] {}", ticket.id, ticket.summary())),
    );
    if let Some(best) = best {
        lines.push(format!("Recommended for you: {}", best.summary()));
    }
    Ok(lines)
}

/// Cart lines with subtotals and the total.
pub(super) fn cart_lines(cart: &CartState) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Your cart is empty.".to_string()];
    }

    let mut lines = vec![format!("Cart ({} tickets)", cart.ticket_count())];
    lines.extend(cart.items.iter().map(|item| {
        format!(
            "  {} {} x{} = {}",
            item.id.short(),
            item.name,
            item.quantity,
            money(item.subtotal())
        )
    }));
    lines.push(format!("Total: {}", money(cart.total())));
    lines
}

fn money(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| "amount too large".to_string(), |amount| format!("${amount}"))
}

fn profile(user: Option<&User>) -> Vec<String> {
    let Some(user) = user else {
        return vec!["Profile".to_string()];
    };
    let profile = user.profile();
    let field = |value: Option<&String>| value.map_or("-", String::as_str).to_string();

    vec![
        "Profile".to_string(),
        format!("  Name:     {}", user.display_name()),
        format!("  Email:    {}", user.email()),
        format!("  Roles:    {}", user.roles().join(", ")),
        format!(
            "  Born:     {}",
            profile
                .date_of_birth
                .map_or_else(|| "-".to_string(), |d| d.to_string())
        ),
        format!("  Document: {}", field(profile.document_number.as_ref())),
        format!("  Phone:    {}", field(profile.phone.as_ref())),
    ]
}
