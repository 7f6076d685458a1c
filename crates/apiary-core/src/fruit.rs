//! Fruit providers
//!
//! Providers are carried by the fruit allele of a tree. The random provider
//! drops each of its products independently; fruit-block providers need
//! dedicated pod blocks next to the leaves.

use apiary_genetics::{BreedingContext, FruitTraits};

/// Provider dropping `product` with chance `yield x modifier`
pub fn random_provider(family: &str, product: &str, modifier: f32, colour: u32) -> FruitTraits {
    FruitTraits {
        family: family.to_string(),
        products: vec![(product.to_string(), modifier)],
        requires_fruit_blocks: false,
        colour,
    }
}

/// Provider that grows its product in fruit blocks
pub fn pod_provider(family: &str, product: &str, modifier: f32, colour: u32) -> FruitTraits {
    FruitTraits {
        requires_fruit_blocks: true,
        ..random_provider(family, product, modifier, colour)
    }
}

/// Identifiers of everything a provider can drop
pub fn product_list(fruit: &FruitTraits) -> Vec<&str> {
    fruit.products.iter().map(|(product, _)| product.as_str()).collect()
}

/// Roll every product once: it drops when the draw is at most
/// `tree_yield x mode_yield x product modifier`
pub fn produce<X: BreedingContext + ?Sized>(
    fruit: &FruitTraits,
    ctx: &mut X,
    tree_yield: f32,
    mode_yield: f32,
) -> Vec<String> {
    fruit
        .products
        .iter()
        .filter(|(_, modifier)| ctx.random_float() <= tree_yield * mode_yield * modifier)
        .map(|(product, _)| product.clone())
        .collect()
}
