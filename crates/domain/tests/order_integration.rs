//! Integration tests for admission and queue progression.
//!
//! These tests drive the pure rules through whole scenarios, keeping the
//! reservoir and order list the way a store would.

use chrono::{Duration, Utc};
use common::OrderId;
use domain::{
    Beverage, DrinkSize, NewBeverage, Order, OrderError, OrderStatus, PlaceOrder,
    ReservoirSettings, Volume, admit, advance, any_in_progress,
};

/// Minimal stand-in for a store: settings plus orders in creation order.
struct Dispenser {
    settings: ReservoirSettings,
    orders: Vec<Order>,
    clock: chrono::DateTime<Utc>,
}

impl Dispenser {
    fn new(remaining: i64, allowed: &[&str]) -> Self {
        Self {
            settings: ReservoirSettings::new(
                Volume::new(remaining),
                ReservoirSettings::default_drink_sizes(),
                allowed.iter().map(|s| s.to_string()).collect(),
            ),
            orders: Vec::new(),
            clock: Utc::now(),
        }
    }

    fn place(&mut self, beverage: &Beverage, size: DrinkSize) -> Result<OrderId, OrderError> {
        let candidate = PlaceOrder::new("John", beverage.id, size)
            .validate()
            .unwrap();
        let mut settings = self.settings.clone();
        self.clock += Duration::milliseconds(1);
        let admission = admit(
            &mut settings,
            candidate,
            beverage,
            any_in_progress(&self.orders),
            self.clock,
        )?;
        self.settings = settings;
        let id = admission.order.id();
        self.orders.push(admission.order);
        Ok(id)
    }

    fn status_of(&self, id: OrderId) -> OrderStatus {
        self.orders.iter().find(|o| o.id() == id).unwrap().status()
    }

    fn in_progress(&self) -> usize {
        self.orders
            .iter()
            .filter(|o| o.status() == OrderStatus::InProgress)
            .count()
    }
}

fn green_tea() -> Beverage {
    NewBeverage {
        name: Some("Green Tea".into()),
        beverage_type: Some("Tea".into()),
        temperature: Some(80.0),
        garnish: Some("Orange".into()),
    }
    .validate()
    .unwrap()
}

mod scenarios {
    use super::*;

    #[test]
    fn two_medium_teas_then_complete_first() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(1000, &["Tea"]);

        let first = dispenser.place(&tea, DrinkSize::Medium).unwrap();
        assert_eq!(dispenser.status_of(first), OrderStatus::InProgress);
        assert_eq!(dispenser.settings.remaining(), Volume::new(750));

        let second = dispenser.place(&tea, DrinkSize::Medium).unwrap();
        assert_eq!(dispenser.status_of(second), OrderStatus::InQueue);
        assert_eq!(dispenser.settings.remaining(), Volume::new(500));

        let completion = advance(&mut dispenser.orders, first).unwrap().unwrap();
        assert_eq!(completion.promoted.map(|o| o.id()), Some(second));
        assert_eq!(dispenser.status_of(first), OrderStatus::Completed);
        assert_eq!(dispenser.status_of(second), OrderStatus::InProgress);
    }

    #[test]
    fn small_reservoir_rejects_medium_order() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(100, &[]);

        let err = dispenser.place(&tea, DrinkSize::Medium).unwrap_err();

        assert_eq!(err, OrderError::InsufficientReservoir);
        assert_eq!(dispenser.settings.remaining(), Volume::new(100));
        assert!(dispenser.orders.is_empty());
    }

    #[test]
    fn completing_unknown_or_queued_order_changes_nothing() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(1000, &[]);
        let first = dispenser.place(&tea, DrinkSize::Small).unwrap();
        let second = dispenser.place(&tea, DrinkSize::Small).unwrap();

        assert!(advance(&mut dispenser.orders, OrderId::new()).unwrap().is_none());
        assert!(matches!(
            advance(&mut dispenser.orders, second),
            Err(OrderError::NotInProgress { .. })
        ));
        assert_eq!(dispenser.status_of(first), OrderStatus::InProgress);
        assert_eq!(dispenser.status_of(second), OrderStatus::InQueue);
    }
}

mod properties {
    use super::*;

    #[test]
    fn rejections_are_idempotent() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(300, &["Coffee"]);

        for _ in 0..5 {
            assert!(dispenser.place(&tea, DrinkSize::Small).is_err());
        }

        assert_eq!(dispenser.settings.remaining(), Volume::new(300));
        assert!(dispenser.orders.is_empty());
    }

    #[test]
    fn reservoir_equals_initial_minus_admitted_volumes() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(1500, &[]);
        let sizes = [
            DrinkSize::Large,
            DrinkSize::Small,
            DrinkSize::Medium,
            DrinkSize::Large,
            DrinkSize::Large,
            DrinkSize::Medium,
            DrinkSize::Small,
        ];

        let mut taken = Volume::zero();
        for size in sizes {
            let before = dispenser.settings.remaining();
            match dispenser.place(&tea, size) {
                Ok(_) => {
                    taken = taken + dispenser.settings.volume_for(size).unwrap();
                    assert!(dispenser.settings.remaining().is_positive());
                }
                Err(OrderError::InsufficientReservoir) => {
                    assert_eq!(dispenser.settings.remaining(), before);
                }
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }

        assert_eq!(dispenser.settings.remaining(), Volume::new(1500) - taken);
    }

    #[test]
    fn at_most_one_in_progress_through_mixed_operations() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(100_000, &[]);
        let mut placed = Vec::new();

        for round in 0..10 {
            placed.push(dispenser.place(&tea, DrinkSize::Small).unwrap());
            assert!(dispenser.in_progress() <= 1);

            if round % 3 == 2 {
                let current = dispenser
                    .orders
                    .iter()
                    .find(|o| o.status() == OrderStatus::InProgress)
                    .map(|o| o.id())
                    .unwrap();
                advance(&mut dispenser.orders, current).unwrap();
                assert!(dispenser.in_progress() <= 1);
            }
        }

        assert_eq!(dispenser.in_progress(), 1);
    }

    #[test]
    fn promotion_is_fifo() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(100_000, &[]);
        let ids: Vec<OrderId> = (0..4)
            .map(|_| dispenser.place(&tea, DrinkSize::Small).unwrap())
            .collect();

        for window in ids.windows(2) {
            let completion = advance(&mut dispenser.orders, window[0]).unwrap().unwrap();
            assert_eq!(completion.promoted.unwrap().id(), window[1]);
        }
    }

    #[test]
    fn status_history_is_a_prefix_of_the_state_machine() {
        let tea = green_tea();
        let mut dispenser = Dispenser::new(100_000, &[]);
        let ids: Vec<OrderId> = (0..3)
            .map(|_| dispenser.place(&tea, DrinkSize::Small).unwrap())
            .collect();
        let mut history: Vec<Vec<OrderStatus>> = ids
            .iter()
            .map(|id| vec![dispenser.status_of(*id)])
            .collect();

        for id in &ids {
            advance(&mut dispenser.orders, *id).unwrap();
            for (i, other) in ids.iter().enumerate() {
                let status = dispenser.status_of(*other);
                if history[i].last() != Some(&status) {
                    history[i].push(status);
                }
            }
        }

        use OrderStatus::*;
        assert_eq!(history[0], vec![InProgress, Completed]);
        assert_eq!(history[1], vec![InQueue, InProgress, Completed]);
        assert_eq!(history[2], vec![InQueue, InProgress, Completed]);
    }
}
