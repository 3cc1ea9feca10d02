mod active_value;
mod seed;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `WedInitializer` plus the seeding traits for a table identifier enum.
///
/// ```ignore
/// #[derive(DeriveIden, SeedableInitializer)]
/// #[seedable(meta(model = ActiveModel, order = INIT_ADMIN_USER_ORDER,
///     create_table = create_admin_user_table, seed_data = get_seed_data))]
/// pub enum AdminUser { Table, Id, ... }
/// ```
#[proc_macro_derive(SeedableInitializer, attributes(seedable))]
pub fn derive_seedable_initializer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match seed::expand_seedable(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Derives `WedInitializer` for a table that ships without seed rows.
#[proc_macro_derive(UnseedableInitializer, attributes(unseedable))]
pub fn derive_unseedable_initializer(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match seed::expand_unseedable(input) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Lets an active enum be assigned straight into an `ActiveModel` field.
#[proc_macro_derive(IntoActiveValue)]
pub fn derive_into_active_value(input: TokenStream) -> TokenStream {
    active_value::derive_into_active_value(input)
}
