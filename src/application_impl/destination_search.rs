use crate::domain_model::Destination;

/// Case-insensitive substring match on title, country or city.
/// An empty query keeps every destination, in order.
pub fn filter_destinations<'a>(destinations: &'a [Destination], query: &str) -> Vec<&'a Destination> {
    let needle = query.to_lowercase();
    destinations
        .iter()
        .filter(|d| {
            [&d.title, &d.country, &d.city]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
