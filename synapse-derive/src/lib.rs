//! Procedural macros for synapse.
//!
//! `#[derive(Module)]` implements `IntoIterator` over `&T` and `&mut T`
//! yielding references to all tensor parameters of the struct, including
//! tensors nested in `Option`s, `Vec`s and other modules. Fields whose
//! references are not iterators over tensors are skipped.

extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields};

/// Derive `IntoIterator` over tensor parameters for a struct
#[proc_macro_derive(Module)]
pub fn module(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(DataStruct { fields: Fields::Named(fields), .. }) => &fields.named,
        _ => panic!("derive(Module) supports only structs with named fields"),
    };

    let mut ref_iterators = quote! {
        trait __InnerMarkerTrait<'a> {
            fn __is_trait_inner_method(&self, res: &mut Vec<&'a synapse_core::Tensor>) {}
        }

        struct __TraitTest<T: Copy>(T);

        impl<'a, T: IntoIterator<Item = &'a synapse_core::Tensor> + Copy> __TraitTest<T> {
            fn __is_trait_inner_method(&self, res: &mut Vec<&'a synapse_core::Tensor>) {
                res.extend((&self.0).into_iter());
            }
        }

        impl<'a, T: Copy> __InnerMarkerTrait<'a> for __TraitTest<T> {}

        let mut res = Vec::new();
    };

    let mut mut_iterators = quote! {
        trait __InnerMarkerTraitMut<'a> {
            fn __is_trait_inner_method(&mut self, res: &mut Vec<&'a mut synapse_core::Tensor>) {}
        }

        struct __TraitTestMut<T>(T);

        impl<'a, T> __TraitTestMut<Option<&'a mut T>>
        where
            &'a mut T: IntoIterator<Item = &'a mut synapse_core::Tensor>,
        {
            fn __is_trait_inner_method(&mut self, res: &mut Vec<&'a mut synapse_core::Tensor>) {
                if let Some(x) = self.0.take() {
                    res.extend(x.into_iter());
                }
            }
        }

        impl<'a, T> __InnerMarkerTraitMut<'a> for __TraitTestMut<T> {}

        let mut res = Vec::new();
    };

    for field in fields.iter() {
        let field_name = match &field.ident {
            Some(ident) => ident,
            None => panic!("Unnamed fields are not supported"),
        };

        let field_ty: &syn::Type = &field.ty;

        ref_iterators = quote! {
            #ref_iterators
            __TraitTest::<&#field_ty>::__is_trait_inner_method(&__TraitTest(&self.#field_name), &mut res);
        };

        mut_iterators = quote! {
            #mut_iterators
            __TraitTestMut::<Option<&mut #field_ty>>::__is_trait_inner_method(&mut __TraitTestMut(Some(&mut self.#field_name)), &mut res);
        };
    }

    let expanded = quote! {
        impl<'a> IntoIterator for &'a #struct_name {
            type Item = &'a synapse_core::Tensor;
            type IntoIter = std::vec::IntoIter<&'a synapse_core::Tensor>;

            fn into_iter(self) -> Self::IntoIter {
                #ref_iterators
                res.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a mut #struct_name {
            type Item = &'a mut synapse_core::Tensor;
            type IntoIter = std::vec::IntoIter<&'a mut synapse_core::Tensor>;

            fn into_iter(self) -> Self::IntoIter {
                #mut_iterators
                res.into_iter()
            }
        }
    };

    TokenStream::from(expanded)
}
