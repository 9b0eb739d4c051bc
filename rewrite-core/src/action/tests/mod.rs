mod mutate_tests;
