//! Command parsing and execution.

use std::io::{self, Write};

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use glowcart_core::models::{OrderStatus, ProductQuery};
use glowcart_core::utils::{format_price, truncate};
use glowcart_core::{ApiClient, Config};

/// Products listed when no limit is given.
const DEFAULT_PRODUCT_LIMIT: u32 = 20;

/// Column width for product and customer names.
const NAME_WIDTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: Option<String> },
    Logout,
    Whoami,
    Products { limit: u32, search: Option<String> },
    Orders { status: Option<OrderStatus> },
    SetOrderStatus { id: String, status: OrderStatus },
    Fees,
    Discounts,
    Contacts,
    Notifications,
}

impl Command {
    /// Parse arguments (without the program name). `Ok(None)` means show usage.
    pub fn parse(args: &[String]) -> Result<Option<Command>, String> {
        let Some(name) = args.first() else {
            return Ok(None);
        };
        let rest = &args[1..];

        let command = match name.as_str() {
            "help" | "--help" | "-h" => return Ok(None),
            "login" => Command::Login {
                email: rest.first().cloned(),
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "products" => {
                let limit = match rest.first() {
                    Some(raw) => raw
                        .parse()
                        .map_err(|_| format!("Invalid limit: {}", raw))?,
                    None => DEFAULT_PRODUCT_LIMIT,
                };
                let search = if rest.len() > 1 {
                    Some(rest[1..].join(" "))
                } else {
                    None
                };
                Command::Products { limit, search }
            }
            "orders" => Command::Orders {
                status: rest.first().map(|s| s.parse()).transpose()?,
            },
            "order-status" => match rest {
                [id, status] => Command::SetOrderStatus {
                    id: id.clone(),
                    status: status.parse()?,
                },
                _ => return Err("Usage: glowcart order-status <order-id> <status>".to_string()),
            },
            "fees" => Command::Fees,
            "discounts" => Command::Discounts,
            "contacts" => Command::Contacts,
            "notifications" => Command::Notifications,
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(Some(command))
    }
}

pub fn print_usage() {
    eprintln!(
        "Usage: glowcart <command>

Commands:
  login [email]                 Log in as an admin
  logout                        Log out and forget the stored token
  whoami                        Show the logged-in admin
  products [limit] [search]     List products
  orders [status]               List orders, optionally by status
  order-status <id> <status>    Change an order's status
  fees                          List delivery fees
  discounts                     List delivery discounts
  contacts                      List contact form submissions
  notifications                 List admin notifications

Statuses: pending, processing, shipped, delivered, cancelled"
    );
}

pub async fn run(command: Command, client: &ApiClient, config: &Config) -> Result<()> {
    match command {
        Command::Login { email } => login(client, config, email).await,
        Command::Logout => {
            client.admin_logout().await?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match client.current_admin() {
                Some(admin) if client.token().is_some() => {
                    println!("{} <{}>", admin.display_name(), admin.email)
                }
                _ => println!("Not logged in."),
            }
            Ok(())
        }
        Command::Products { limit, search } => {
            let query = ProductQuery {
                search,
                ..ProductQuery::limit(limit)
            };
            let payload = client.fetch_products(&query).await?;
            for product in &payload.products {
                let stock = product
                    .stock
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<26} {:<width$} {:>14} {:>6}",
                    product.id,
                    truncate(&product.name, NAME_WIDTH),
                    format_price(product.effective_price()),
                    stock,
                    width = NAME_WIDTH
                );
            }
            if let Some(total) = payload.total {
                println!("\n{} of {} products", payload.products.len(), total);
            }
            Ok(())
        }
        Command::Orders { status } => {
            let orders = client.fetch_orders(status).await?;
            if orders.is_empty() {
                println!("No orders.");
            }
            for order in &orders {
                println!(
                    "{:<26} {:<width$} {:<11} {:>4} items {:>14}",
                    order.id,
                    truncate(&order.customer.name, NAME_WIDTH),
                    order.status,
                    order.item_count(),
                    format_price(order.total),
                    width = NAME_WIDTH
                );
            }
            Ok(())
        }
        Command::SetOrderStatus { id, status } => {
            client.change_order_status(&id, status).await?;
            println!("Order {} is now {}.", id, status);
            Ok(())
        }
        Command::Fees => {
            for fee in client.fetch_delivery_fees().await? {
                println!("{:<26} {:<24} {:>12}", fee.id, fee.location, format_price(fee.fee));
            }
            Ok(())
        }
        Command::Discounts => {
            for discount in client.fetch_delivery_discounts().await? {
                println!(
                    "{:<26} from {:>14}  {:>5}% off delivery{}",
                    discount.id,
                    format_price(discount.min_order_amount),
                    discount.percentage,
                    if discount.active { "" } else { " (inactive)" }
                );
            }
            Ok(())
        }
        Command::Contacts => {
            for contact in client.fetch_contacts().await? {
                println!(
                    "{} <{}> {}\n  {}\n",
                    contact.name,
                    contact.email,
                    contact.subject.as_deref().unwrap_or(""),
                    contact.message
                );
            }
            Ok(())
        }
        Command::Notifications => {
            for notification in client.fetch_notifications().await? {
                let marker = if notification.read { " " } else { "*" };
                println!(
                    "{} {}  {}",
                    marker,
                    notification.title,
                    notification.message.as_deref().unwrap_or("")
                );
            }
            Ok(())
        }
    }
}

async fn login(client: &ApiClient, config: &Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) => email,
        None => prompt_email()?,
    };
    if email.is_empty() {
        return Err(anyhow!("Email required"));
    }
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let admin = client.admin_login(&email, &password).await?;

    // Env overrides stay out of the saved file
    let mut stored = Config::load_file()?;
    stored.last_email = Some(email);
    if let Err(e) = stored.save() {
        warn!(error = %e, "Failed to save config");
    }

    println!("Logged in as {}.", admin.display_name());
    Ok(())
}

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_usage() {
        assert_eq!(Command::parse(&[]), Ok(None));
        assert_eq!(Command::parse(&args(&["--help"])), Ok(None));
        assert!(Command::parse(&args(&["dance"])).is_err());
    }

    #[test]
    fn test_parse_products() {
        assert_eq!(
            Command::parse(&args(&["products"])),
            Ok(Some(Command::Products { limit: 20, search: None }))
        );
        assert_eq!(
            Command::parse(&args(&["products", "5", "lip", "oil"])),
            Ok(Some(Command::Products {
                limit: 5,
                search: Some("lip oil".to_string())
            }))
        );
        assert!(Command::parse(&args(&["products", "many"])).is_err());
    }

    #[test]
    fn test_parse_orders() {
        assert_eq!(
            Command::parse(&args(&["orders", "shipped"])),
            Ok(Some(Command::Orders {
                status: Some(OrderStatus::Shipped)
            }))
        );
        assert_eq!(
            Command::parse(&args(&["order-status", "o-1", "delivered"])),
            Ok(Some(Command::SetOrderStatus {
                id: "o-1".to_string(),
                status: OrderStatus::Delivered
            }))
        );
        assert!(Command::parse(&args(&["order-status", "o-1"])).is_err());
        assert!(Command::parse(&args(&["orders", "lost"])).is_err());
    }
}
