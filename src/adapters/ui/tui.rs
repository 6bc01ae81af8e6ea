//! Implements InputPort. Inquire-based interactive storefront.
//!
//! Browse (search, category, level, sort) -> pick a course -> add/remove.
//! Cart view -> remove, clear, checkout. Account -> sign in / sign out.

use crate::domain::{
    CategoryFilter, Catalog, Course, DomainError, Level, LevelFilter, QueryCriteria, SortKey,
    categories, query,
};
use crate::ports::{IdentityPort, InputPort};
use crate::usecases::{CartMutation, CartOutcome, CartService};
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, InquireError, Select, Text};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

const MENU_BROWSE: &str = "Browse courses";
const MENU_CART: &str = "View cart";
const MENU_ACCOUNT: &str = "Account";
const MENU_QUIT: &str = "Quit";

const CART_REMOVE: &str = "Remove a course";
const CART_CLEAR: &str = "Clear cart";
const CART_CHECKOUT: &str = "Checkout";
const BACK: &str = "Back";

const ALL: &str = "All";

/// Applies the global inquire theme.
pub fn apply_theme() {
    let mut config = RenderConfig::default_colored();
    config.prompt_prefix = Styled::new("›").with_fg(Color::LightCyan);
    config.highlighted_option_prefix = Styled::new("▸").with_fg(Color::LightMagenta);
    config.selected_option = Some(StyleSheet::new().with_fg(Color::LightCyan));
    inquire::set_global_render_config(config);
}

/// `1234567` -> `₹1,234,567`
pub fn format_price(amount: u64, symbol: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}", symbol, grouped)
}

fn input_err(e: InquireError) -> DomainError {
    DomainError::Input(e.to_string())
}

/// Esc / Ctrl-C on a prompt means "go back", not an error.
fn or_back<T>(r: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(input_err(e)),
    }
}

/// TUI adapter. Inquire prompts over the catalog, cart and identity provider.
pub struct TuiInputPort {
    catalog: Arc<Catalog>,
    cart: Arc<CartService>,
    identity: Arc<dyn IdentityPort>,
    currency: String,
    criteria: Mutex<QueryCriteria>,
}

impl TuiInputPort {
    pub fn new(
        catalog: Arc<Catalog>,
        cart: Arc<CartService>,
        identity: Arc<dyn IdentityPort>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            cart,
            identity,
            currency: currency.into(),
            criteria: Mutex::new(QueryCriteria::default()),
        }
    }

    fn price(&self, amount: u64) -> String {
        format_price(amount, &self.currency)
    }

    fn course_line(&self, course: &Course, in_cart: bool) -> String {
        let marker = if in_cart { "[in cart] " } else { "" };
        let discount = course
            .discount_percent()
            .map(|p| format!(" ({}% OFF)", p))
            .unwrap_or_default();
        format!(
            "{}{} | {} | {} | ★{:.1} | {} students | {}{}",
            marker,
            course.title,
            course.instructor,
            course.level,
            course.rating,
            course.students_count,
            self.price(course.price),
            discount
        )
    }

    fn print_details(&self, course: &Course) {
        println!();
        println!("{}", course.title);
        println!("  {}", course.description);
        println!(
            "  {} · {} · {} · {} lessons",
            course.category, course.level, course.duration_label, course.lessons_count
        );
        println!("  Instructor: {}", course.instructor);
        match course.original_price {
            Some(original) if original > course.price => println!(
                "  Price: {} (was {})",
                self.price(course.price),
                self.price(original)
            ),
            _ => println!("  Price: {}", self.price(course.price)),
        }
        println!();
    }

    async fn header(&self) -> String {
        let count = self.cart.cart_count().await;
        let total = self.cart.cart_total().await;
        let who = match self.identity.current_user().await {
            Some(u) => format!("signed in as {}", u.name),
            None => "guest".to_string(),
        };
        format!("Cart: {} item(s), {} | {}", count, self.price(total), who)
    }

    fn report(&self, title: &str, m: &CartMutation) {
        match m.outcome {
            CartOutcome::Added => println!("Added \"{}\" to your cart.", title),
            CartOutcome::AlreadyInCart => println!("\"{}\" is already in your cart.", title),
            CartOutcome::UnknownCourse => println!("\"{}\" is no longer available.", title),
            CartOutcome::Removed => println!("Removed \"{}\" from your cart.", title),
            CartOutcome::NotInCart => println!("\"{}\" was not in your cart.", title),
            CartOutcome::Cleared => println!("Cart cleared."),
        }
        if let Some(e) = &m.persist_error {
            println!("Warning: your cart could not be saved ({}).", e);
        }
    }

    /// Rebuild criteria from prompts, starting from the previous values.
    async fn edit_criteria(&self) -> Result<Option<QueryCriteria>, DomainError> {
        let current = self.criteria.lock().await.clone();

        let Some(search) = or_back(
            Text::new("Search courses, instructors, or topics:")
                .with_initial_value(&current.search_text)
                .prompt(),
        )?
        else {
            return Ok(None);
        };

        let mut category_opts = vec![ALL.to_string()];
        category_opts.extend(categories(&self.catalog));
        let category_cursor = match &current.category {
            CategoryFilter::All => 0,
            CategoryFilter::Only(c) => category_opts.iter().position(|o| o == c).unwrap_or(0),
        };
        let Some(category) = or_back(
            Select::new("Category", category_opts)
                .with_starting_cursor(category_cursor)
                .prompt(),
        )?
        else {
            return Ok(None);
        };

        let mut level_opts = vec![ALL.to_string()];
        level_opts.extend(Level::ALL.iter().map(|l| l.to_string()));
        let Some(level) = or_back(Select::new("Level", level_opts).prompt())? else {
            return Ok(None);
        };
        let level = match level.parse::<Level>() {
            Ok(l) => LevelFilter::Only(l),
            Err(_) => LevelFilter::All,
        };

        let sort_cursor = SortKey::ALL
            .iter()
            .position(|k| *k == current.sort_key)
            .unwrap_or(0);
        let Some(sort_key) = or_back(
            Select::new("Sort by", SortKey::ALL.to_vec())
                .with_starting_cursor(sort_cursor)
                .prompt(),
        )?
        else {
            return Ok(None);
        };

        let criteria = QueryCriteria {
            search_text: search,
            category: CategoryFilter::parse(&category),
            level,
            sort_key,
        };
        *self.criteria.lock().await = criteria.clone();
        Ok(Some(criteria))
    }

    async fn browse(&self) -> Result<(), DomainError> {
        let Some(criteria) = self.edit_criteria().await? else {
            return Ok(());
        };

        loop {
            let results = query(self.catalog.courses(), &criteria);
            if results.is_empty() {
                println!("No courses match your filters.");
                return Ok(());
            }
            println!("Showing {} of {} courses", results.len(), self.catalog.len());

            let mut options = Vec::with_capacity(results.len() + 1);
            for c in &results {
                options.push(self.course_line(c, self.cart.is_in_cart(&c.id).await));
            }
            options.push(BACK.to_string());

            let Some(picked) = or_back(Select::new("Courses", options).raw_prompt())? else {
                return Ok(());
            };
            let Some(course) = results.get(picked.index) else {
                return Ok(());
            };

            self.print_details(course);
            if self.cart.is_in_cart(&course.id).await {
                if let Some(true) =
                    or_back(Confirm::new("Remove from cart?").with_default(false).prompt())?
                {
                    let m = self.cart.remove_from_cart(&course.id).await;
                    self.report(&course.title, &m);
                }
            } else if let Some(true) =
                or_back(Confirm::new("Add to cart?").with_default(true).prompt())?
            {
                let m = self.cart.add_to_cart(&course.id).await;
                self.report(&course.title, &m);
            }
        }
    }

    async fn view_cart(&self) -> Result<(), DomainError> {
        loop {
            let entries = self.cart.entries().await;
            if entries.is_empty() {
                println!("Your cart is empty.");
                return Ok(());
            }

            println!();
            println!("Shopping Cart ({})", entries.len());
            for e in &entries {
                println!(
                    "  {} | {} | added {}",
                    e.course.title,
                    self.price(e.course.price),
                    e.added_at.format("%Y-%m-%d %H:%M")
                );
            }
            let savings = self.cart.cart_savings().await;
            if savings > 0 {
                println!("  You save {}", self.price(savings));
            }
            println!("  Total Amount: {}", self.price(self.cart.cart_total().await));
            println!();

            let options = vec![CART_REMOVE, CART_CLEAR, CART_CHECKOUT, BACK];
            let Some(choice) = or_back(Select::new("Cart", options).prompt())? else {
                return Ok(());
            };
            match choice {
                CART_REMOVE => {
                    let titles: Vec<String> =
                        entries.iter().map(|e| e.course.title.clone()).collect();
                    let Some(picked) =
                        or_back(Select::new("Remove which course?", titles).raw_prompt())?
                    else {
                        continue;
                    };
                    if let Some(entry) = entries.get(picked.index) {
                        let m = self.cart.remove_from_cart(entry.id()).await;
                        self.report(&entry.course.title, &m);
                    }
                }
                CART_CLEAR => {
                    if let Some(true) =
                        or_back(Confirm::new("Clear the cart?").with_default(false).prompt())?
                    {
                        let m = self.cart.clear_cart().await;
                        self.report("", &m);
                    }
                }
                CART_CHECKOUT => self.checkout().await,
                _ => return Ok(()),
            }
        }
    }

    async fn checkout(&self) {
        match self.identity.current_user().await {
            None => println!("Please sign in to checkout."),
            Some(user) => {
                let total = self.cart.cart_total().await;
                println!(
                    "Payment gateway not integrated yet. {} would be charged {}.",
                    user.email,
                    self.price(total)
                );
            }
        }
    }

    async fn account(&self) -> Result<(), DomainError> {
        if let Some(user) = self.identity.current_user().await {
            let prompt = format!("Signed in as {} <{}>. Sign out?", user.name, user.email);
            if let Some(true) = or_back(Confirm::new(&prompt).with_default(false).prompt())? {
                self.identity.logout().await?;
                println!("Signed out.");
            }
            return Ok(());
        }

        let Some(name) = or_back(Text::new("Name:").prompt())? else {
            return Ok(());
        };
        let Some(email) = or_back(Text::new("Email:").prompt())? else {
            return Ok(());
        };
        match self.identity.login(&name, &email).await {
            Ok(user) => println!("Welcome, {}!", user.name),
            Err(e) => {
                warn!(error = %e, "sign in rejected");
                println!("{}", e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let header = self.header().await;
            println!("{}", header);
            let options = vec![MENU_BROWSE, MENU_CART, MENU_ACCOUNT, MENU_QUIT];
            let Some(choice) = or_back(Select::new("Main menu", options).prompt())? else {
                return Ok(());
            };
            match choice {
                MENU_BROWSE => self.browse().await?,
                MENU_CART => self.view_cart().await?,
                MENU_ACCOUNT => self.account().await?,
                _ => return Ok(()),
            }
        }
    }
}
