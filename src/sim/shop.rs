//! Between-wave shop
//!
//! Purchases validate silently: anything that cannot apply right now
//! (not enough gold, weapon caps, dash already owned) is a no-op, never
//! an error. Offers stay on the board after a purchase and can be bought
//! again while gold lasts.

use rand::Rng;

use super::state::{GameEvent, GameState, Phase, WeaponInstance};
use crate::tuning::{MAX_WEAPON_LEVEL, MAX_WEAPON_TYPES, SHOP_OFFERS, StatKind, UpgradeEffect};

/// Called by the wave director when a shop opens: free first reroll,
/// fresh offer set.
pub fn enter(state: &mut GameState) {
    state.shop.reroll_price = 0;
    roll_offers(state);
}

/// Deal SHOP_OFFERS distinct catalog entries onto the board.
pub fn roll_offers(state: &mut GameState) {
    let n = state.tuning.upgrades.len();
    let count = SHOP_OFFERS.min(n);
    let mut offers = Vec::with_capacity(count);
    while offers.len() < count {
        let pick = state.rng.random_range(0..n);
        if !offers.contains(&pick) {
            offers.push(pick);
        }
    }
    state.shop.offers = offers;
}

/// Buy one offered item. Returns whether it applied; every rejection
/// leaves the state untouched.
pub fn purchase(state: &mut GameState, item: usize) -> bool {
    if state.phase != Phase::Shop || !state.shop.offers.contains(&item) {
        return false;
    }
    let Some(spec) = state.tuning.upgrades.get(item) else {
        return false;
    };
    let cost = spec.cost;
    let effect = spec.effect;
    if state.player.gold < cost || !applicable(state, effect) {
        return false;
    }

    state.player.gold -= cost;
    apply(state, effect);
    state.events.push(GameEvent::Purchased { upgrade: item });
    log::info!(
        "bought {} for {cost} gold",
        state.tuning.upgrades[item].name
    );
    true
}

/// Reroll the offer set. The first reroll each visit is free; the price
/// climbs by one gold per reroll after that.
pub fn reroll(state: &mut GameState) -> bool {
    if state.phase != Phase::Shop {
        return false;
    }
    let price = state.shop.reroll_price;
    if state.player.gold < price {
        return false;
    }
    state.player.gold -= price;
    state.shop.reroll_price += 1;
    roll_offers(state);
    state.events.push(GameEvent::Rerolled { price });
    true
}

/// Can this effect do anything right now?
fn applicable(state: &GameState, effect: UpgradeEffect) -> bool {
    match effect {
        UpgradeEffect::Stat { .. } | UpgradeEffect::Heal { .. } => true,
        UpgradeEffect::Dash => !state.dash.unlocked,
        UpgradeEffect::Weapon { weapon } => {
            match state.weapons.iter().find(|w| w.kind == weapon) {
                Some(owned) => owned.level < MAX_WEAPON_LEVEL,
                None => state.weapons.len() < MAX_WEAPON_TYPES,
            }
        }
    }
}

fn apply(state: &mut GameState, effect: UpgradeEffect) {
    match effect {
        UpgradeEffect::Stat { stat, delta } => match stat {
            StatKind::Damage => state.stats.damage += delta,
            StatKind::AttackSpeed => state.stats.attack_speed += delta,
            StatKind::MoveSpeed => state.stats.move_speed += delta,
            StatKind::MaxHp => {
                // raises the ceiling and the current value together
                state.stats.max_hp += delta;
                state.player.hp = (state.player.hp + delta).min(state.stats.max_hp);
            }
            StatKind::Armor => state.stats.armor += delta,
            StatKind::HpRegen => state.stats.hp_regen += delta,
            StatKind::LifeSteal => state.stats.life_steal += delta,
        },
        UpgradeEffect::Heal { amount } => {
            state.player.hp = (state.player.hp + amount).min(state.stats.max_hp);
        }
        UpgradeEffect::Weapon { weapon } => {
            match state.weapons.iter_mut().find(|w| w.kind == weapon) {
                Some(owned) => owned.level += 1,
                None => state.weapons.push(WeaponInstance {
                    kind: weapon,
                    level: 1,
                    cooldown: 0.0,
                }),
            }
        }
        UpgradeEffect::Dash => state.dash.unlocked = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// A state sitting in the shop with a known gold balance
    fn shop_state(gold: u32) -> GameState {
        let mut state = GameState::new(42, Tuning::default()).unwrap();
        state.select_starting_weapon("Pistol").unwrap();
        state.phase = Phase::Shop;
        state.player.gold = gold;
        enter(&mut state);
        state.events.clear();
        state
    }

    /// Force a known catalog entry onto the board and return its index
    fn offer(state: &mut GameState, name: &str) -> usize {
        let item = state
            .tuning
            .upgrades
            .iter()
            .position(|u| u.name == name)
            .unwrap();
        if !state.shop.offers.contains(&item) {
            state.shop.offers[0] = item;
        }
        item
    }

    #[test]
    fn test_offers_are_distinct() {
        let state = shop_state(0);
        let offers = &state.shop.offers;
        assert_eq!(offers.len(), SHOP_OFFERS);
        for (i, a) in offers.iter().enumerate() {
            assert!(!offers[i + 1..].contains(a), "duplicate offer {a}");
        }
    }

    #[test]
    fn test_purchase_deducts_exact_cost_and_applies() {
        let mut state = shop_state(100);
        let item = offer(&mut state, "Damage Up");
        let before = state.stats.damage;
        assert!(purchase(&mut state, item));
        assert_eq!(state.player.gold, 85);
        assert_eq!(state.stats.damage, before + 5.0);
        assert!(state.events.contains(&GameEvent::Purchased { upgrade: item }));
    }

    #[test]
    fn test_purchase_without_gold_is_a_noop() {
        let mut state = shop_state(5);
        let item = offer(&mut state, "Damage Up");
        let stats = state.stats;
        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 5);
        assert_eq!(state.stats, stats);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_purchase_outside_shop_is_a_noop() {
        let mut state = shop_state(100);
        let item = offer(&mut state, "Damage Up");
        state.phase = Phase::Combat;
        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 100);
    }

    #[test]
    fn test_unoffered_item_cannot_be_bought() {
        let mut state = shop_state(100);
        let item = (0..state.tuning.upgrades.len())
            .find(|i| !state.shop.offers.contains(i))
            .expect("catalog is larger than the offer board");
        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 100);
    }

    #[test]
    fn test_max_hp_raises_current_hp_too() {
        let mut state = shop_state(100);
        state.player.hp = 50.0;
        let item = offer(&mut state, "Max HP");
        assert!(purchase(&mut state, item));
        assert_eq!(state.stats.max_hp, 120.0);
        assert_eq!(state.player.hp, 70.0);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut state = shop_state(100);
        state.player.hp = 90.0;
        let item = offer(&mut state, "Heal");
        assert!(purchase(&mut state, item));
        assert_eq!(state.player.hp, 100.0);
        // still purchasable at full HP, it just wastes the gold
        assert!(purchase(&mut state, item));
        assert_eq!(state.player.hp, 100.0);
        assert_eq!(state.player.gold, 80);
    }

    #[test]
    fn test_weapon_purchase_unlocks_then_levels() {
        let mut state = shop_state(500);
        let item = offer(&mut state, "SMG");
        assert!(purchase(&mut state, item));
        assert_eq!(state.weapons.len(), 2);
        assert_eq!(state.weapons[1].level, 1);
        assert!(purchase(&mut state, item));
        assert_eq!(state.weapons.len(), 2);
        assert_eq!(state.weapons[1].level, 2);
    }

    #[test]
    fn test_weapon_level_cap() {
        let mut state = shop_state(500);
        state.weapons[0].level = MAX_WEAPON_LEVEL;
        let item = offer(&mut state, "Pistol");
        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 500);
        assert_eq!(state.weapons[0].level, MAX_WEAPON_LEVEL);
    }

    #[test]
    fn test_weapon_type_cap() {
        // a seventh weapon type exists in the catalog but the roster is full
        let mut tuning = Tuning::default();
        tuning.weapons.push(crate::tuning::WeaponSpec {
            name: "Railgun".into(),
            damage_mod: 20.0,
            cooldown: 80.0,
            projectiles: 1,
            spread: 0.0,
            projectile_speed: 14.0,
        });
        tuning.upgrades.push(crate::tuning::UpgradeSpec {
            name: "Railgun".into(),
            desc: "New weapon".into(),
            cost: 10,
            effect: UpgradeEffect::Weapon { weapon: 6 },
        });
        let item = tuning.upgrades.len() - 1;

        let mut state = GameState::new(42, tuning).unwrap();
        state.select_starting_weapon("Pistol").unwrap();
        for kind in 1..MAX_WEAPON_TYPES {
            state.weapons.push(WeaponInstance {
                kind,
                level: 1,
                cooldown: 0.0,
            });
        }
        state.phase = Phase::Shop;
        state.player.gold = 500;
        enter(&mut state);
        state.shop.offers[0] = item;

        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 500);
        assert_eq!(state.weapons.len(), MAX_WEAPON_TYPES);
    }

    #[test]
    fn test_dash_purchase_unlocks_once() {
        let mut state = shop_state(500);
        let item = offer(&mut state, "Dash");
        assert!(purchase(&mut state, item));
        assert!(state.dash.unlocked);
        assert_eq!(state.player.gold, 460);
        // second copy refuses and refunds nothing
        assert!(!purchase(&mut state, item));
        assert_eq!(state.player.gold, 460);
    }

    #[test]
    fn test_reroll_price_starts_free_and_climbs() {
        let mut state = shop_state(10);
        assert!(reroll(&mut state));
        assert_eq!(state.player.gold, 10);
        assert!(reroll(&mut state));
        assert_eq!(state.player.gold, 9);
        assert!(reroll(&mut state));
        assert_eq!(state.player.gold, 7);
        assert_eq!(state.shop.reroll_price, 3);
    }

    #[test]
    fn test_reroll_refused_without_gold() {
        let mut state = shop_state(0);
        assert!(reroll(&mut state), "first reroll is free");
        assert!(!reroll(&mut state), "second costs one gold we lack");
        assert_eq!(state.shop.reroll_price, 1);
    }

    #[test]
    fn test_shop_entry_resets_reroll_price() {
        let mut state = shop_state(50);
        reroll(&mut state);
        reroll(&mut state);
        assert_eq!(state.shop.reroll_price, 2);
        enter(&mut state);
        assert_eq!(state.shop.reroll_price, 0);
    }
}
