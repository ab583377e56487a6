//! # Vendinha Command Line
//!
//! ## Usage
//! ```bash
//! vendinha dashboard
//! vendinha price-list
//! vendinha search coca
//! vendinha sell 7894900011517:2 --method cash --paid 30.00
//! vendinha sell 1 3:0.5 --method debt --client 1
//! vendinha scan-invoice ./nota.jpg
//! vendinha identify ./produto.jpg --accept
//! vendinha init-config
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use vendinha_core::{Money, PaymentMethod, Quantity};
use vendinha_shop::{
    init_tracing, open_shop, CaptureKind, Identification, Shop, ShopConfig, ShopError, ShopResult,
};
use vendinha_vision::CapturedImage;

/// Counter sales, credit ledgers and invoice reconciliation for a small shop.
#[derive(Parser, Debug)]
#[command(name = "vendinha")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to shop.toml (default: platform config directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results and errors as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the default shop.toml.
    InitConfig,

    /// Sales, receivables and payables.
    Dashboard,

    /// One line per product.
    PriceList,

    /// Search products by name or barcode.
    Search {
        #[arg(required = true)]
        term: Vec<String>,
    },

    /// Clients with a negative balance.
    Debtors,

    /// Sell items and check out.
    Sell {
        /// `<id|barcode>[:qty]`, quantity defaults to 1.
        #[arg(required = true, value_parser = parse_item)]
        items: Vec<SaleItem>,

        /// cash, card or debt.
        #[arg(short, long, default_value = "cash")]
        method: PaymentMethod,

        /// Amount handed over (default: the cart total).
        #[arg(short, long, value_parser = parse_money)]
        paid: Option<Money>,

        /// Client charged for debt sales.
        #[arg(long)]
        client: Option<String>,
    },

    /// Reconcile a supplier invoice photograph.
    ScanInvoice { image: PathBuf },

    /// Identify a product photograph.
    Identify {
        image: PathBuf,

        /// Register an unknown product at the suggested price.
        #[arg(long)]
        accept: bool,
    },

    /// Read a barcode from a photograph.
    Barcode { image: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
struct SaleItem {
    key: String,
    quantity: Quantity,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = e.report();
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => eprintln!("{}", text),
                    Err(_) => eprintln!("{}", report),
                }
            } else {
                eprintln!("✗ {}", report);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ShopResult<()> {
    if let Command::InitConfig = cli.command {
        let path = ShopConfig::default().save(cli.config)?;
        println!("✓ Wrote {}", path.display());
        return Ok(());
    }

    let config = ShopConfig::load(cli.config)?;
    let shop = open_shop(config).await?;
    let out = Output { json: cli.json };

    match cli.command {
        Command::InitConfig => Ok(()),
        Command::Dashboard => {
            let dashboard = shop.dashboard();
            out.emit(&dashboard, || {
                let cfg = shop.config();
                println!("{}", cfg.store.name);
                println!("  Sales:       {}", cfg.format_currency(dashboard.total_sales));
                println!("  Receivable:  {}", cfg.format_currency(dashboard.total_receivable));
                println!("  Payable:     {}", cfg.format_currency(dashboard.total_payable));
                for day in &dashboard.daily_totals {
                    println!("  {}  {}", day.date, cfg.format_currency(day.total));
                }
                for sale in &dashboard.recent_sales {
                    println!(
                        "  {}  {:<20} {:>10}  {}",
                        sale.timestamp.format("%Y-%m-%d %H:%M"),
                        sale.client_name,
                        cfg.format_currency(sale.total),
                        sale.payment_method
                    );
                }
            })
        }
        Command::PriceList => {
            let list = shop.price_list();
            out.emit(&list, || println!("{}", list))
        }
        Command::Search { term } => {
            let found = shop.search(&term.join(" "))?;
            out.emit(&found, || {
                for p in &found {
                    println!(
                        "  {:<8} {:<30} {:>10}  stock {} {}",
                        p.id,
                        p.name,
                        shop.config().format_currency(p.price),
                        p.stock,
                        p.unit
                    );
                }
            })
        }
        Command::Debtors => {
            let debtors = shop.debtors();
            out.emit(&debtors, || {
                for c in &debtors {
                    println!("  {:<8} {:<30} {}", c.id, c.name, shop.config().format_currency(c.balance));
                }
            })
        }
        Command::Sell {
            items,
            method,
            paid,
            client,
        } => sell(&shop, &items, method, paid, client.as_deref(), &out).await,
        Command::ScanInvoice { image } => {
            let image = load_image(&image)?;
            let ticket = shop.begin_capture(CaptureKind::Invoice);
            let report = shop.scan_invoice(ticket, image).await?;
            out.emit(&report, || {
                println!(
                    "✓ {} items processed ({} updated, {} new)",
                    report.lines.len(),
                    report.updated_count(),
                    report.created_count()
                );
                println!("  Payable recorded: {}", shop.config().format_currency(report.debt_amount));
            })
        }
        Command::Identify { image, accept } => {
            let image = load_image(&image)?;
            let ticket = shop.begin_capture(CaptureKind::Product);
            match shop.identify_product(ticket, image).await? {
                Identification::AddedToCart { product } => {
                    out.emit(&product, || println!("✓ {} added to cart", product.name))
                }
                Identification::Offer { offer } if accept => {
                    let product = shop.accept_offer(offer).await?;
                    out.emit(&product, || println!("✓ Registered {}", product.name))
                }
                Identification::Offer { offer } => out.emit(&offer, || {
                    println!(
                        "? {} not in catalog, suggested price {} (use --accept to register)",
                        offer.name,
                        shop.config().format_currency(offer.price)
                    )
                }),
            }
        }
        Command::Barcode { image } => {
            let image = load_image(&image)?;
            let ticket = shop.begin_capture(CaptureKind::Barcode);
            let code = shop.read_barcode(ticket, image).await?;
            out.emit(&code, || match &code {
                Some(code) => println!("{}", code),
                None => println!("No barcode found"),
            })
        }
    }
}

async fn sell(
    shop: &Shop,
    items: &[SaleItem],
    method: PaymentMethod,
    paid: Option<Money>,
    client: Option<&str>,
    out: &Output,
) -> ShopResult<()> {
    if let Some(client) = client {
        shop.select_client(client)?;
    }
    for item in items {
        if shop.product(&item.key).is_some() {
            shop.add_to_cart(&item.key, item.quantity)?;
        } else {
            shop.add_by_barcode(&item.key, item.quantity)?;
        }
    }

    let paid = paid.unwrap_or_else(|| shop.cart().total());
    let sale = shop.checkout(method, paid).await?;
    out.emit(&sale, || {
        let cfg = shop.config();
        println!("✓ Sale {} ({})", sale.id, sale.payment_method);
        println!("  Total:  {}", cfg.format_currency(sale.total));
        println!("  Change: {}", cfg.format_currency(sale.change));
    })
}

// =============================================================================
// Helpers
// =============================================================================

struct Output {
    json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce()) -> ShopResult<()> {
        if self.json {
            let text = serde_json::to_string_pretty(value)
                .map_err(|e| ShopError::Config(format!("Cannot encode output: {e}")))?;
            println!("{}", text);
        } else {
            human();
        }
        Ok(())
    }
}

/// Accepts `30`, `30.5` and `30,50`.
fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

fn parse_money(value: &str) -> Result<Money, String> {
    parse_decimal(value)
        .and_then(Money::from_decimal)
        .ok_or_else(|| format!("'{}' is not a valid amount", value))
}

fn parse_item(value: &str) -> Result<SaleItem, String> {
    let (key, quantity) = match value.split_once(':') {
        Some((key, qty)) => {
            let quantity = parse_decimal(qty)
                .and_then(Quantity::from_decimal)
                .ok_or_else(|| format!("'{}' is not a valid quantity", qty))?;
            (key, quantity)
        }
        None => (value, Quantity::from_units(1)),
    };
    if key.trim().is_empty() {
        return Err(format!("'{}' has no product id or barcode", value));
    }
    Ok(SaleItem {
        key: key.trim().to_string(),
        quantity,
    })
}

fn load_image(path: &Path) -> ShopResult<CapturedImage> {
    let bytes = std::fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    };
    Ok(CapturedImage::from_bytes(&bytes, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_arguments() {
        let cli = Cli::try_parse_from([
            "vendinha", "--json", "sell", "7894900011517:2", "3:0,5", "--method", "debt", "--client", "1",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Sell {
                items,
                method,
                paid,
                client,
            } => {
                assert_eq!(
                    items,
                    vec![
                        SaleItem {
                            key: "7894900011517".into(),
                            quantity: Quantity::from_units(2),
                        },
                        SaleItem {
                            key: "3".into(),
                            quantity: Quantity::from_decimal(0.5).unwrap(),
                        },
                    ]
                );
                assert_eq!(method, PaymentMethod::Debt);
                assert_eq!(paid, None);
                assert_eq!(client.as_deref(), Some("1"));
            }
            other => panic!("expected sell, got {:?}", other),
        }
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["vendinha", "dashboard", "--config", "/tmp/shop.toml"]).unwrap();
        assert!(matches!(cli.command, Command::Dashboard));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/shop.toml")));
        assert!(!cli.json);
    }

    #[test]
    fn test_paid_amount_with_comma() {
        let cli = Cli::try_parse_from(["vendinha", "sell", "1", "-p", "30,50"]).unwrap();
        match cli.command {
            Command::Sell { paid, method, .. } => {
                assert_eq!(paid, Some(Money::from_cents(3050)));
                assert_eq!(method, PaymentMethod::Cash);
            }
            other => panic!("expected sell, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Cli::try_parse_from(["vendinha", "sell", "1:abc"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "sell", "1", "--method", "pix"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "sell"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "identify"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "refund"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "dashboard", "--config"]).is_err());
        assert!(Cli::try_parse_from(["vendinha", "sell", "1", "--bogus"]).is_err());
    }

    #[test]
    fn test_identify_accept_flag() {
        let cli = Cli::try_parse_from(["vendinha", "identify", "produto.png", "--accept"]).unwrap();
        match cli.command {
            Command::Identify { image, accept } => {
                assert_eq!(image, PathBuf::from("produto.png"));
                assert!(accept);
            }
            other => panic!("expected identify, got {:?}", other),
        }
    }
}
