//! Receipt
//!
//! Terminal tables for product listings, the cart, orders and tracking.

use std::io;

use jiff::{civil::Date, tz::TimeZone};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    orders::{Order, Tracking},
    pricing::{OrderTotals, TotalPriceError, format_brl, format_money, line_total},
    products::Product,
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating totals.
    #[error(transparent)]
    TotalPrice(#[from] TotalPriceError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Write a product listing.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_products(out: &mut impl io::Write, products: &[&Product]) -> Result<(), ReceiptError> {
    if products.is_empty() {
        return writeln!(out, "Nenhum produto encontrado.").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Produto", "Marca", "Preço", "De", "Avaliação", "Estoque"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product_label(product),
            product.brand.clone(),
            format_money(&product.price),
            product
                .original_price
                .as_ref()
                .map(format_money)
                .unwrap_or_default(),
            format!("{} ({})", product.rating, product.reviews),
            if product.in_stock { "Sim" } else { "Esgotado" }.to_string(),
        ]);
    }

    write_table(out, builder, 3..5)
}

/// Write a single product's details.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_product(out: &mut impl io::Write, product: &Product) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Campo", "Valor"]);
    builder.push_record(["ID".to_string(), product.id.to_string()]);
    builder.push_record(["Produto".to_string(), product_label(product)]);
    builder.push_record(["Categoria".to_string(), product.category.clone()]);
    builder.push_record(["Subcategoria".to_string(), product.subcategory.clone()]);
    builder.push_record(["Marca".to_string(), product.brand.clone()]);
    builder.push_record(["Preço".to_string(), format_money(&product.price)]);

    if let Some(original) = &product.original_price {
        builder.push_record(["De".to_string(), format_money(original)]);
    }

    if let Some(percent) = product.discount_percent() {
        builder.push_record(["Desconto".to_string(), format!("{percent}%")]);
    }

    builder.push_record([
        "Avaliação".to_string(),
        format!("{} ({} avaliações)", product.rating, product.reviews),
    ]);
    builder.push_record([
        "Estoque".to_string(),
        if product.in_stock { "Em estoque" } else { "Esgotado" }.to_string(),
    ]);

    write_table(out, builder, 1..1)
}

/// Write the cart with its totals.
///
/// # Errors
///
/// Returns an error if totals overflow or writing fails.
pub fn write_cart(out: &mut impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "Seu carrinho está vazio.").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Produto", "Qtd", "Unitário", "Total"]);

    for item in cart.items() {
        builder.push_record([
            item.id.to_string(),
            item.name.clone(),
            item.quantity.to_string(),
            format_brl(item.price),
            format_money(&line_total(item)?),
        ]);
    }

    write_table(out, builder, 2..5)?;

    let totals = OrderTotals::from_subtotal(cart.total_price()?)?;

    write_totals(out, &totals)?;

    let savings = cart.savings()?;

    if savings.to_minor_units() > 0 {
        write_summary_line(out, "Economia:", &format_money(&savings))?;
    }

    write_summary_line(out, "Itens:", &cart.item_count().to_string())
}

/// Write a list of orders.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_orders(out: &mut impl io::Write, orders: &[&Order]) -> Result<(), ReceiptError> {
    if orders.is_empty() {
        return writeln!(out, "Nenhum pedido encontrado.").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Pedido", "Data", "Status", "Itens", "Total"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            format_date(placed_on(order)),
            order.status.label().to_string(),
            order.item_count().to_string(),
            format_brl(order.total),
        ]);
    }

    write_table(out, builder, 3..5)
}

/// Write an order with its lines and totals.
///
/// # Errors
///
/// Returns an error if a line total overflows or writing fails.
pub fn write_order(out: &mut impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    writeln!(
        out,
        "Pedido #{} | {} | {}",
        order.id,
        format_date(placed_on(order)),
        order.status.label()
    )
    .map_err(|_err| ReceiptError::IO)?;

    let mut builder = Builder::default();

    builder.push_record(["ID", "Produto", "Qtd", "Unitário", "Total"]);

    for line in &order.items {
        builder.push_record([
            line.id.to_string(),
            line.name.clone(),
            line.quantity.to_string(),
            format_brl(line.price),
            format_money(&line_total(line)?),
        ]);
    }

    write_table(out, builder, 2..5)?;

    if let Some(subtotal) = order.subtotal {
        write_summary_line(out, "Subtotal:", &format_brl(subtotal))?;
    }

    if let Some(shipping) = order.shipping {
        write_summary_line(out, "Frete:", &shipping_label(shipping))?;
    }

    write_summary_line(out, "Total:", &format_brl(order.total))?;

    if let Some(method) = order.payment_method {
        write_summary_line(out, "Pagamento:", method.label())?;
    }

    Ok(())
}

/// Write a delivery timeline.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_tracking(out: &mut impl io::Write, tracking: &Tracking) -> Result<(), ReceiptError> {
    writeln!(
        out,
        "Código de rastreamento: {}\nStatus: {}\nPrevisão de entrega: {}",
        tracking.code,
        tracking.status.label(),
        format_date(tracking.estimated_delivery)
    )
    .map_err(|_err| ReceiptError::IO)?;

    let mut builder = Builder::default();

    builder.push_record(["", "Etapa", "Descrição", "Data"]);

    for step in &tracking.steps {
        let date = if step.completed {
            format_date(step.date)
        } else {
            format!("Previsão: {}", format_date(step.date))
        };

        builder.push_record([
            if step.completed { "✔" } else { "…" }.to_string(),
            step.title.to_string(),
            step.description.to_string(),
            date,
        ]);
    }

    write_table(out, builder, 3..4)
}

/// Write subtotal, shipping and total.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing fails.
pub fn write_totals(out: &mut impl io::Write, totals: &OrderTotals) -> Result<(), ReceiptError> {
    write_summary_line(out, "Subtotal:", &format_money(&totals.subtotal))?;
    write_summary_line(out, "Frete:", &shipping_label(totals.shipping.to_minor_units()))?;
    write_summary_line(out, "Total:", &format_money(&totals.total))
}

/// Format a date the way the storefront shows it, e.g. `15/01/2024`.
pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

fn placed_on(order: &Order) -> Date {
    order.date.to_zoned(TimeZone::UTC).date()
}

fn shipping_label(shipping: i64) -> String {
    if shipping == 0 {
        "Grátis".to_string()
    } else {
        format_brl(shipping)
    }
}

fn product_label(product: &Product) -> String {
    match &product.badge {
        Some(badge) => format!("{} [{badge}]", product.name),
        None => product.name.clone(),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_columns: std::ops::Range<usize>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);

    if !money_columns.is_empty() {
        table.modify(Columns::new(money_columns), Alignment::right());
    }

    writeln!(out, "{table}").map_err(|_err| ReceiptError::IO)
}

fn write_summary_line(out: &mut impl io::Write, label: &str, value: &str) -> Result<(), ReceiptError> {
    writeln!(out, " {label:<12}{value:>16}").map_err(|_err| ReceiptError::IO)
}
