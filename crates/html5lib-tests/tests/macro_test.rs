//! This module contains generated HTML5Lib test cases

use html5lib_tests::html5lib_tests;

// Generate test functions from the test data file
html5lib_tests!("crates/html5lib-tests/data/tree-construction/tests1.dat");
