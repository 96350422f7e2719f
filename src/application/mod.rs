pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod error;
pub mod faqs;
pub mod products;
pub mod repos;
pub mod seed;
pub mod site;
pub mod testimonials;

#[cfg(test)]
pub(crate) mod testing;
