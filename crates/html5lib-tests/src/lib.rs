//! `html5lib_tests!("path/to/*.dat")` expands into one `#[test]` function per
//! `#data` case in every matched fixture file, each parsing its input with
//! [`html5_core::parse`] and comparing [`build_tree`]'s rendering of the
//! result against the fixture's `#document` block.

use glob::glob;
use proc_macro::TokenStream;
use quote::quote;
use std::fs;
use syn::{parse_macro_input, LitStr};
use html5lib_tests_gen_tests::parse_test_file;

fn process_test_file(test_file_path: &str) -> proc_macro2::TokenStream {
    let file_name = test_file_path
        .rsplit('/')
        .next()
        .and_then(|s| s.split('.').next())
        .unwrap_or("unknown")
        .replace('-', "_");

    let content = fs::read_to_string(test_file_path).expect("Failed to read test file");
    let test_cases = parse_test_file(&content);

    let file_mod_name = syn::Ident::new(&file_name, proc_macro2::Span::call_site());

    let test_fns = test_cases.iter().map(|test| {
        let test_name = syn::Ident::new(
            &format!("line{:04}", test.line_number),
            proc_macro2::Span::call_site(),
        );
        let input = &test.input;
        let expected = &test.expected_document;

        quote! {
            #[test]
            fn #test_name() {
                let result = html5_core::parse(#input, html5_core::Options::new().collect_errors(true));
                let actual = build_tree(&result.dom);
                let expected = parse_expected_document(#expected);

                pretty_assertions::assert_str_eq!(
                    expected,
                    actual,
                    "Error on input:\n{}",
                    #input,
                );
            }
        }
    });

    quote! {
        pub mod #file_mod_name {
            use html5lib_tests_gen_tests::{build_tree, parse_expected_document};

            #(#test_fns)*
        }
    }
}

#[proc_macro]
pub fn html5lib_tests(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LitStr);
    let pattern = input.value();

    let mut all_tests = Vec::new();

    for entry in glob(&pattern).expect("Failed to read glob pattern") {
        match entry {
            Ok(path) => {
                let path_str = path.to_str().unwrap();
                all_tests.push(process_test_file(path_str));
            }
            Err(e) => panic!("Error processing test file: {:?}", e),
        }
    }

    let expanded = quote! {
        pub mod html5lib_tests {
            #(#all_tests)*
        }
    };

    expanded.into()
}
