mod test_arxiv;
