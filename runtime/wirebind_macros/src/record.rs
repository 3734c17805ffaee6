use convert_case::{Case, Casing};
use darling::util::{Flag, Ignored};
use darling::{FromDeriveInput, FromField, FromMeta};
use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{DeriveInput, Ident, Type, parse_macro_input};

#[derive(FromDeriveInput)]
#[darling(attributes(wire), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: syn::Generics,
    data: darling::ast::Data<Ignored, RecordField>,
    rename_all: Option<RenameRule>,
}

#[derive(FromField)]
#[darling(attributes(wire))]
struct RecordField {
    ident: Option<Ident>,
    ty: Type,
    rename: Option<String>,
    skip: Flag,
    flatten: Flag,
    quoted: Flag,
    custom: Flag,
    converter: Flag,
    body_only: Flag,
}

/// The casing conventions supported by `#[wire(rename_all = "...")]`.
#[derive(Debug, Clone, Copy)]
enum RenameRule {
    Lower,
    Upper,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl FromMeta for RenameRule {
    fn from_string(value: &str) -> darling::Result<Self> {
        let rule = match value {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "camelCase" => Self::Camel,
            "PascalCase" => Self::Pascal,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            _ => {
                return Err(darling::Error::unknown_field_with_alts(
                    value,
                    &[
                        "lowercase",
                        "UPPERCASE",
                        "camelCase",
                        "PascalCase",
                        "snake_case",
                        "SCREAMING_SNAKE_CASE",
                        "kebab-case",
                    ],
                ));
            }
        };
        Ok(rule)
    }
}

impl RenameRule {
    fn apply(self, field_name: &str) -> String {
        match self {
            RenameRule::Lower => field_name.to_lowercase(),
            RenameRule::Upper => field_name.to_uppercase(),
            RenameRule::Camel => field_name.to_case(Case::Camel),
            RenameRule::Pascal => field_name.to_case(Case::Pascal),
            RenameRule::Snake => field_name.to_case(Case::Snake),
            RenameRule::ScreamingSnake => field_name.to_case(Case::Constant),
            RenameRule::Kebab => field_name.to_case(Case::Kebab),
        }
    }
}

/// How a field takes part in decoding.
enum FieldKind {
    Skipped,
    Flattened,
    Accessed {
        /// The name of the wrapper type in `wirebind::record`.
        wrapper: &'static str,
    },
}

impl RecordField {
    fn kind(&self) -> darling::Result<FieldKind> {
        let ident = self.ident()?;
        let set: Vec<&str> = [
            ("skip", &self.skip),
            ("flatten", &self.flatten),
            ("custom", &self.custom),
            ("converter", &self.converter),
            ("body_only", &self.body_only),
        ]
        .into_iter()
        .filter(|(_, flag)| flag.is_present())
        .map(|(name, _)| name)
        .collect();

        if set.len() > 1 {
            let listed = set
                .iter()
                .map(|name| format!("`{name}`"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(darling::Error::custom(format!(
                "`{ident}` can only use one of {listed}.\n\n\
                help: Remove the attributes that don't apply."
            ))
            .with_span(ident));
        }

        let modifies_tokens = self.rename.is_some() || self.quoted.is_present();
        let kind = match set.first().copied() {
            Some("skip") => FieldKind::Skipped,
            Some("flatten") if modifies_tokens => {
                return Err(darling::Error::custom(format!(
                    "`{ident}` is flattened: its own fields are decoded instead, \
                    so `rename` and `quoted` don't apply to it."
                ))
                .with_span(ident));
            }
            Some("flatten") => FieldKind::Flattened,
            Some("custom") => FieldKind::Accessed { wrapper: "RawText" },
            Some("converter") => FieldKind::Accessed {
                wrapper: "Converted",
            },
            Some("body_only") => FieldKind::Accessed {
                wrapper: "BodyOnly",
            },
            _ => FieldKind::Accessed { wrapper: "Typed" },
        };
        Ok(kind)
    }

    fn ident(&self) -> darling::Result<&Ident> {
        self.ident
            .as_ref()
            .ok_or_else(|| darling::Error::custom("`#[derive(Record)]` requires named fields"))
    }

    fn wire_name(&self, rename_all: Option<RenameRule>) -> darling::Result<String> {
        let ident = self.ident()?;
        if let Some(rename) = &self.rename {
            if rename.is_empty() {
                return Err(
                    darling::Error::custom("The wire name of a field can't be empty.")
                        .with_span(ident),
                );
            }
            return Ok(rename.clone());
        }
        let rust_name = ident.to_string();
        let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        Ok(match rename_all {
            Some(rule) => rule.apply(rust_name),
            None => rust_name.to_owned(),
        })
    }
}

pub(super) fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match _derive_record(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn _derive_record(input: DeriveInput) -> Result<proc_macro2::TokenStream, darling::Error> {
    let input = RecordInput::from_derive_input(&input)?;
    reject_invalid_inputs(&input)?;

    let struct_ident = &input.ident;
    let Some(fields) = input.data.as_ref().take_struct() else {
        return Err(darling::Error::unsupported_shape("enum").with_span(struct_ident));
    };

    let mut errors = darling::Error::accumulator();
    let mut describe = Vec::with_capacity(fields.len());
    let mut visit = Vec::with_capacity(fields.len());
    for field in fields.iter() {
        let Some((kind, ident)) = errors.handle(field.kind().and_then(|k| Ok((k, field.ident()?))))
        else {
            continue;
        };
        let ty = &field.ty;
        let ty_span = ty.span();
        match kind {
            FieldKind::Skipped => {}
            FieldKind::Flattened => {
                describe.push(quote_spanned! { ty_span =>
                    <#ty as ::wirebind::record::Record>::describe(fields);
                });
                visit.push(quote_spanned! { ty_span =>
                    ::wirebind::record::Record::visit(&mut self.#ident, visitor)?;
                });
            }
            FieldKind::Accessed { wrapper } => {
                let Some(wire_name) = errors.handle(field.wire_name(input.rename_all)) else {
                    continue;
                };
                let rust_name = ident.to_string();
                let quoted = field.quoted.is_present();
                let wrapper = Ident::new(wrapper, ty_span);
                let key = quote! {
                    ::wirebind::record::FieldKey::new(#wire_name, #rust_name, #quoted)
                };
                describe.push(quote_spanned! { ty_span =>
                    fields.push(::wirebind::record::FieldDescriptor::new(
                        #key,
                        ::wirebind::record::#wrapper::<#ty>::shape(),
                    ));
                });
                visit.push(quote_spanned! { ty_span =>
                    visitor.visit_field(&#key, &mut ::wirebind::record::#wrapper(&mut self.#ident))?;
                });
            }
        }
    }
    errors.finish()?;

    let tokens = quote! {
        #[automatically_derived]
        impl ::wirebind::record::Record for #struct_ident {
            #[allow(unused_variables)]
            fn describe(fields: &mut ::std::vec::Vec<::wirebind::record::FieldDescriptor>) {
                #(#describe)*
            }

            #[allow(unused_variables)]
            fn visit(
                &mut self,
                visitor: &mut dyn ::wirebind::record::FieldVisitor,
            ) -> ::core::result::Result<(), ::wirebind::DecodeError> {
                #(#visit)*
                ::core::result::Result::Ok(())
            }
        }

        #[automatically_derived]
        impl ::wirebind::literal::Field for #struct_ident {
            fn shape() -> ::wirebind::literal::Shape {
                ::wirebind::literal::Shape::Unsupported(::core::any::type_name::<Self>())
            }

            fn slot(&mut self) -> ::wirebind::literal::Slot<'_> {
                ::wirebind::literal::Slot::Unsupported {
                    type_name: ::core::any::type_name::<Self>(),
                }
            }
        }
    };
    Ok(tokens)
}

fn reject_invalid_inputs(input: &RecordInput) -> Result<(), darling::Error> {
    let struct_ident = &input.ident;
    if let Some(generic) = input.generics.type_params().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(Record)]` can't be applied to structs with generic type parameters, such as `{struct_ident}`.\n\n\
            help: Consider using concrete types instead.",
        ))
        .with_span(generic));
    }
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(Record)]` can't be applied to structs with generic lifetimes, such as `{struct_ident}`.\n\n\
            help: Records must own their data.",
        ))
        .with_span(lifetime));
    }
    Ok(())
}
