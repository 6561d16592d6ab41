pub use darling::{FromAttributes, FromMeta, ast::NestedMeta};
pub use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
pub use itertools::Itertools;
pub use proc_macro2::{Span, TokenStream};
pub use quote::quote;
pub use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, FieldsNamed, Ident, LitStr, Result,
    Visibility, parse2, spanned::Spanned,
};
