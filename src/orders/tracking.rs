//! Order Tracking

use jiff::{ToSpan, civil::Date, tz::TimeZone};
use smallvec::SmallVec;

use crate::orders::{Order, OrderStatus};

/// Days between placement and the estimated delivery.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 7;

const STEPS: [(&str, &str, i64); 4] = [
    (
        "Pedido Confirmado",
        "Seu pedido foi confirmado e está sendo preparado",
        0,
    ),
    (
        "Produto Separado",
        "Produto foi separado e embalado para envio",
        1,
    ),
    (
        "Saiu para Entrega",
        "Produto saiu da transportadora e está a caminho",
        2,
    ),
    (
        "Em Rota de Entrega",
        "Produto está na rota de entrega local",
        DELIVERY_ESTIMATE_DAYS,
    ),
];

/// One milestone of the delivery timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingStep {
    /// Short title
    pub title: &'static str,

    /// What happened at this milestone
    pub description: &'static str,

    /// Date reached, or expected for pending steps
    pub date: Date,

    /// Whether the milestone has been reached
    pub completed: bool,
}

/// Delivery timeline derived from an order's status and placement date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracking {
    /// Carrier tracking code
    pub code: String,

    /// Current status
    pub status: OrderStatus,

    /// Placement date plus the delivery estimate
    pub estimated_delivery: Date,

    /// Milestones in order
    pub steps: SmallVec<[TrackingStep; 4]>,
}

impl Tracking {
    /// Build the timeline for an order. Dates are computed in UTC.
    pub fn for_order(order: &Order) -> Self {
        let placed = order.date.to_zoned(TimeZone::UTC).date();

        let completed = match order.status {
            OrderStatus::Processing | OrderStatus::Canceled => 1,
            OrderStatus::InTransit => 3,
            OrderStatus::Delivered => STEPS.len(),
        };

        let steps = STEPS
            .iter()
            .enumerate()
            .map(|(idx, &(title, description, offset))| TrackingStep {
                title,
                description,
                date: placed.saturating_add(offset.days()),
                completed: idx < completed,
            })
            .collect();

        Self {
            code: format!("BR{}TS", order.id),
            status: order.status,
            estimated_delivery: placed.saturating_add(DELIVERY_ESTIMATE_DAYS.days()),
            steps,
        }
    }

    /// The first milestone not yet reached, if any.
    pub fn next_step(&self) -> Option<&TrackingStep> {
        self.steps.iter().find(|step| !step.completed)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, civil::date};
    use testresult::TestResult;

    use crate::{
        orders::{OrderId, OrderLine},
        products::ProductId,
    };

    use super::*;

    fn order(status: OrderStatus) -> Result<Order, jiff::Error> {
        let placed: Timestamp = "2024-01-15T14:30:00Z".parse()?;

        Ok(Order {
            id: OrderId::from("TXK8H9P2L"),
            date: placed,
            status,
            total: 1598_00,
            items: vec![OrderLine {
                id: ProductId::from("1"),
                name: "Teclado".to_string(),
                image: String::new(),
                quantity: 1,
                price: 1598_00,
            }],
            subtotal: None,
            shipping: None,
            payment_method: None,
        })
    }

    #[test]
    fn estimated_delivery_is_a_week_after_placement() -> TestResult {
        let tracking = order(OrderStatus::Processing)?.tracking();

        assert_eq!(tracking.estimated_delivery, date(2024, 1, 22));
        assert_eq!(tracking.code, "BRTXK8H9P2LTS");

        Ok(())
    }

    #[test]
    fn in_transit_completes_three_steps() -> TestResult {
        let tracking = order(OrderStatus::InTransit)?.tracking();

        let completed: Vec<bool> = tracking.steps.iter().map(|step| step.completed).collect();

        assert_eq!(completed, [true, true, true, false]);
        assert_eq!(tracking.next_step().map(|step| step.title), Some("Em Rota de Entrega"));

        Ok(())
    }

    #[test]
    fn delivered_completes_every_step() -> TestResult {
        let tracking = order(OrderStatus::Delivered)?.tracking();

        assert!(tracking.steps.iter().all(|step| step.completed));
        assert!(tracking.next_step().is_none());

        Ok(())
    }

    #[test]
    fn step_dates_follow_placement() -> TestResult {
        let tracking = order(OrderStatus::Processing)?.tracking();

        let dates: Vec<Date> = tracking.steps.iter().map(|step| step.date).collect();

        assert_eq!(
            dates,
            [
                date(2024, 1, 15),
                date(2024, 1, 16),
                date(2024, 1, 17),
                date(2024, 1, 22)
            ]
        );

        Ok(())
    }
}
