//! Tower upgrade model: tier graph traversal, compounding stat changes and
//! sell value.

use nova_defence_core::{Tower, TowerConfig, TowerTier, UpgradeConfig, UpgradeError};

/// Share of the total investment refunded on sale, as `numerator / denominator` (60%).
const SELL_VALUE_NUMERATOR: u64 = 3;
const SELL_VALUE_DENOMINATOR: u64 = 5;

/// Advances a tower one tier, multiplying its current stats.
///
/// The tower is left untouched when `tier` is not one legal step from the
/// tower's current tier.
pub fn apply_upgrade(
    tower: &mut Tower,
    tier: TowerTier,
    upgrade: &UpgradeConfig,
) -> Result<(), UpgradeError> {
    if !tower.tier.can_upgrade_to(tier) {
        return Err(UpgradeError::IllegalTier {
            from: tower.tier,
            to: tier,
        });
    }

    let modifiers = upgrade.modifiers;
    if let Some(multiplier) = modifiers.damage {
        tower.damage *= multiplier;
    }
    if let Some(multiplier) = modifiers.range {
        tower.range *= multiplier;
    }
    if let Some(multiplier) = modifiers.fire_rate {
        tower.fire_rate *= multiplier;
    }
    if let (Some(multiplier), Some(radius)) =
        (modifiers.splash_radius, tower.splash_radius.as_mut())
    {
        *radius *= multiplier;
    }
    if upgrade.special_effect.is_some() {
        tower.special_effect = upgrade.special_effect;
    }
    tower.tier = tier;
    tower.total_invested = tower.total_invested.saturating_add(upgrade.cost);
    Ok(())
}

/// Currency refunded when a tower with the given investment is sold.
#[must_use]
pub fn sell_value(total_invested: u32) -> u32 {
    let refund = u64::from(total_invested) * SELL_VALUE_NUMERATOR / SELL_VALUE_DENOMINATOR;
    u32::try_from(refund).unwrap_or(u32::MAX)
}

/// Display name of a tower archetype at the given tier.
#[must_use]
pub fn display_name(config: &TowerConfig, tier: TowerTier) -> &str {
    config
        .upgrades
        .get(tier)
        .map_or(config.name.as_str(), |upgrade| upgrade.name.as_str())
}

/// Upgrade steps reachable from the tower's current tier.
#[must_use]
pub fn available_upgrades<'a>(
    config: &'a TowerConfig,
    tower: &Tower,
) -> Vec<(TowerTier, &'a UpgradeConfig)> {
    tower
        .tier
        .next_tiers()
        .iter()
        .filter_map(|&tier| config.upgrades.get(tier).map(|upgrade| (tier, upgrade)))
        .collect()
}
