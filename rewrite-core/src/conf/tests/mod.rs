mod compile_tests;
