use clap::{Args, Subcommand};
use vitrine::{
    orders::{Order, OrderId, OrderStatus},
    receipt,
};
use vitrine_app::config::StoreConfig;

use super::{open_storefront, save_storefront, stdout};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, most recent first
    List(ListArgs),

    /// Show an order's lines and totals
    Show(OrderArgs),

    /// Show an order's delivery timeline
    Track(OrderArgs),

    /// Change an order's status
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only orders whose code contains this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order code
    id: String,
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Order code
    id: String,

    /// New status (processing, in_transit, delivered, canceled)
    status: OrderStatus,
}

pub(crate) fn run(config: &StoreConfig, command: OrdersCommand) -> Result<(), String> {
    let mut storefront = open_storefront(config)?;
    let mut out = stdout();

    match command.command {
        OrdersSubcommand::List(args) => {
            let orders: Vec<&Order> = storefront
                .orders()
                .search(args.search.as_deref().unwrap_or_default());

            receipt::write_orders(&mut out, &orders).map_err(|error| error.to_string())
        }
        OrdersSubcommand::Show(args) => {
            let order = storefront
                .order(&OrderId::new(args.id))
                .map_err(|error| error.to_string())?;

            receipt::write_order(&mut out, order).map_err(|error| error.to_string())
        }
        OrdersSubcommand::Track(args) => {
            let order = storefront
                .order(&OrderId::new(args.id))
                .map_err(|error| error.to_string())?;

            receipt::write_tracking(&mut out, &order.tracking()).map_err(|error| error.to_string())
        }
        OrdersSubcommand::Status(args) => {
            let id = OrderId::new(args.id);

            storefront
                .update_order_status(&id, args.status)
                .map_err(|error| error.to_string())?;

            save_storefront(&mut storefront)?;

            let order = storefront.order(&id).map_err(|error| error.to_string())?;

            receipt::write_order(&mut out, order).map_err(|error| error.to_string())
        }
    }
}
