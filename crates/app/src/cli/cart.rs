use clap::{Args, Subcommand};
use vitrine::{products::ProductId, receipt};
use vitrine_app::config::StoreConfig;

use super::{open_storefront, save_storefront, stdout};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its totals
    Show,

    /// Add one unit of a product
    Add(ProductArgs),

    /// Remove a product
    Remove(ProductArgs),

    /// Set a product's quantity; zero or less removes it
    Set(SetArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Product id
    id: String,

    /// New quantity
    #[arg(allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(config: &StoreConfig, command: CartCommand) -> Result<(), String> {
    let mut storefront = open_storefront(config)?;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            storefront
                .add_to_cart(&ProductId::new(args.id))
                .map_err(|error| error.to_string())?;
        }
        CartSubcommand::Remove(args) => {
            storefront.cart_store().remove_item(&ProductId::new(args.id));
        }
        CartSubcommand::Set(args) => {
            storefront
                .cart_store()
                .set_quantity(&ProductId::new(args.id), args.quantity);
        }
        CartSubcommand::Clear => storefront.cart_store().clear(),
    }

    save_storefront(&mut storefront)?;

    receipt::write_cart(&mut stdout(), storefront.cart()).map_err(|error| error.to_string())
}
