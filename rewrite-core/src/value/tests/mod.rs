mod getter_tests;
mod operation_tests;
